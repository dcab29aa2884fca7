use voxland_geom::Vec3;

use crate::face::{Face, QUAD_UVS};

/// Flat vertex/index buffers for one mesh.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
}

impl MeshBuild {
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * 4 * 3);
        self.norm.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.idx.reserve(n_quads * 6);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    #[inline]
    pub fn position(&self, i: u32) -> Vec3 {
        let i = i as usize * 3;
        Vec3::new(self.pos[i], self.pos[i + 1], self.pos[i + 2])
    }

    #[inline]
    pub fn normal(&self, i: u32) -> Vec3 {
        let i = i as usize * 3;
        Vec3::new(self.norm[i], self.norm[i + 1], self.norm[i + 2])
    }

    /// Triangles as vertex-index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.idx.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Appends the quad for `face` of the unit cell whose min corner is `(x,y,z)`.
    pub fn add_face(&mut self, x: usize, y: usize, z: usize, face: Face) {
        let base = self.vertex_count() as u32;
        let n = face.normal();
        for (i, (ox, oy, oz)) in face.corners().into_iter().enumerate() {
            self.pos.extend_from_slice(&[
                (x + ox as usize) as f32,
                (y + oy as usize) as f32,
                (z + oz as usize) as f32,
            ]);
            self.norm.extend_from_slice(&[n.x, n.y, n.z]);
            let (u, v) = QUAD_UVS[i];
            self.uv.extend_from_slice(&[u, v]);
        }
        self.idx.extend(face.fan().iter().map(|&k| base + k));
    }
}
