use crate::core::entity::Body;
use crate::core::geometry::Mesh;

/// Handle into the [`DrawStore`]. Stale handles resolve to `None` rather
/// than panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawHandle(usize);

/// Slot store for renderer-cached meshes, standing in for the display-list
/// register/deregister lifecycle: bodies register their mesh on creation and
/// deregister it when the level is torn down.
#[derive(Debug, Default)]
pub struct DrawStore {
    slots: Vec<Option<Mesh>>,
    free: Vec<usize>,
}

impl DrawStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, mesh: Mesh) -> DrawHandle {
        match self.free.pop() {
            Some(i) => {
                self.slots[i] = Some(mesh);
                DrawHandle(i)
            }
            None => {
                self.slots.push(Some(mesh));
                DrawHandle(self.slots.len() - 1)
            }
        }
    }

    pub fn deregister(&mut self, handle: DrawHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            if slot.take().is_some() {
                self.free.push(handle.0);
            }
        }
    }

    pub fn get(&self, handle: DrawHandle) -> Option<&Mesh> {
        self.slots.get(handle.0).and_then(|s| s.as_ref())
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

/// Everything the renderer consumes per frame: bodies with their drawables.
/// Owned exclusively by the main loop; passed by reference into the motion
/// and view code each frame.
#[derive(Debug, Default)]
pub struct Scene {
    pub bodies: Vec<Body>,
    pub store: DrawStore,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_body(&mut self, body: Body) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Tear down all bodies, releasing their drawables. Must only run
    /// between frames, never while a render pass is reading the store.
    pub fn clear(&mut self) {
        let handles: Vec<DrawHandle> = self.bodies.drain(..).filter_map(|b| b.drawable).collect();
        for handle in handles {
            self.store.deregister(handle);
        }
    }
}
