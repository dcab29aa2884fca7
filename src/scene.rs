use std::sync::Arc;

use hashbrown::HashSet;
use voxland_mesh_cpu::ChunkMeshCPU;

/// Receives mesh set changes once per tick.
pub trait SceneSink {
    fn update_meshes(&mut self, added: &[Arc<ChunkMeshCPU>], removed: &[Arc<ChunkMeshCPU>]);
}

#[derive(Default)]
pub struct MeshDiff {
    pub added: Vec<Arc<ChunkMeshCPU>>,
    pub removed: Vec<Arc<ChunkMeshCPU>>,
}

impl MeshDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Meshes are compared by handle identity, so a rebuilt chunk shows up as
/// one removal and one addition.
pub fn diff_meshes(current: &[Arc<ChunkMeshCPU>], next: &[Arc<ChunkMeshCPU>]) -> MeshDiff {
    let cur: HashSet<*const ChunkMeshCPU> = current.iter().map(Arc::as_ptr).collect();
    let nxt: HashSet<*const ChunkMeshCPU> = next.iter().map(Arc::as_ptr).collect();
    MeshDiff {
        added: next
            .iter()
            .filter(|m| !cur.contains(&Arc::as_ptr(*m)))
            .cloned()
            .collect(),
        removed: current
            .iter()
            .filter(|m| !nxt.contains(&Arc::as_ptr(*m)))
            .cloned()
            .collect(),
    }
}

/// Tracks the live mesh set and logs each change.
#[derive(Default)]
pub struct LoggingSink {
    pub live_meshes: usize,
    pub live_triangles: usize,
}

impl SceneSink for LoggingSink {
    fn update_meshes(&mut self, added: &[Arc<ChunkMeshCPU>], removed: &[Arc<ChunkMeshCPU>]) {
        for m in added {
            self.live_triangles += m.triangle_count();
        }
        for m in removed {
            self.live_triangles = self.live_triangles.saturating_sub(m.triangle_count());
        }
        self.live_meshes = (self.live_meshes + added.len()).saturating_sub(removed.len());
        log::debug!(
            "scene +{} -{} live={} tris={}",
            added.len(),
            removed.len(),
            self.live_meshes,
            self.live_triangles
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxland_chunk::ChunkBuf;
    use voxland_mesh_cpu::build_chunk_mesh_cpu;
    use voxland_world::ChunkCoord;

    fn mesh(cx: i32) -> Arc<ChunkMeshCPU> {
        Arc::new(build_chunk_mesh_cpu(&ChunkBuf::empty(ChunkCoord::new(cx, 0, 0), 2, 2, 2)))
    }

    #[test]
    fn diff_by_handle() {
        let (a, b, c) = (mesh(0), mesh(1), mesh(2));
        let rebuilt_b = mesh(1);
        let d = diff_meshes(&[a.clone(), b.clone()], &[a.clone(), rebuilt_b.clone(), c.clone()]);
        assert_eq!(d.added.len(), 2);
        assert!(d.added.iter().any(|m| Arc::ptr_eq(m, &rebuilt_b)));
        assert!(d.added.iter().any(|m| Arc::ptr_eq(m, &c)));
        assert_eq!(d.removed.len(), 1);
        assert!(Arc::ptr_eq(&d.removed[0], &b));
        assert!(diff_meshes(&[a.clone()], &[a]).is_empty());
    }

    #[test]
    fn logging_sink_counts_live_meshes() {
        let (a, b) = (mesh(0), mesh(1));
        let mut sink = LoggingSink::default();
        sink.update_meshes(&[a.clone(), b], &[]);
        assert_eq!(sink.live_meshes, 2);
        sink.update_meshes(&[], &[a]);
        assert_eq!(sink.live_meshes, 1);
    }
}
