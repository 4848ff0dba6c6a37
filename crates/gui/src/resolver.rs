//! Re-evaluates bound endpoints after geometry changes

use glam::Vec3;

use crate::host::SceneQuery;
use crate::state::lines::{Endpoint, FeatureKind, FeatureRef};

/// Counts from one resolver pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Bound endpoints moved to a freshly resolved position
    pub resolved: usize,
    /// Bound endpoints whose feature no longer exists; kept at their last position
    pub frozen: usize,
}

impl ResolveReport {
    pub fn merge(&mut self, other: ResolveReport) {
        self.resolved += other.resolved;
        self.frozen += other.frozen;
    }
}

/// World position of a feature in the current evaluated scene, or None
/// when the object is gone or the index is stale.
pub fn resolve_feature(feature: &FeatureRef, scene: &dyn SceneQuery) -> Option<Vec3> {
    let evaluated = scene.evaluated_mesh(&feature.mesh)?;
    let local = match feature.kind {
        FeatureKind::Vertex(index) => evaluated.mesh.position(index)?,
        FeatureKind::EdgePoint { edge, t } => {
            let (a, b) = evaluated.mesh.edge_endpoints(edge)?;
            a.lerp(b, t)
        }
    };
    let world = evaluated.transform.transform_point3(local);
    world.is_finite().then_some(world)
}

/// Refresh a set of endpoints in place. Static endpoints are skipped.
pub fn resolve_endpoints<'a>(
    endpoints: impl IntoIterator<Item = &'a mut Endpoint>,
    scene: &dyn SceneQuery,
) -> ResolveReport {
    let mut report = ResolveReport::default();
    for endpoint in endpoints {
        let Endpoint::Bound { feature, last } = endpoint else {
            continue;
        };
        match resolve_feature(feature, scene) {
            Some(world) => {
                *last = world;
                report.resolved += 1;
            }
            None => {
                tracing::debug!(mesh = %feature.mesh, kind = ?feature.kind, "bound endpoint frozen");
                report.frozen += 1;
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::EvaluatedMesh;
    use crate::viewport::mesh::{cube, MeshData};
    use glam::Mat4;
    use shared::ObjectId;

    struct Single(MeshData, Mat4);

    impl SceneQuery for Single {
        fn visible_objects(&self) -> Vec<ObjectId> {
            vec!["m".into()]
        }

        fn evaluated_mesh(&self, id: &str) -> Option<EvaluatedMesh<'_>> {
            (id == "m").then_some(EvaluatedMesh {
                mesh: &self.0,
                transform: self.1,
            })
        }
    }

    #[test]
    fn test_vertex_follows_transform() {
        let transform = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let scene = Single(cube(2.0, 2.0, 2.0), transform);
        let mut ep = Endpoint::bound(FeatureRef::vertex("m", 6), Vec3::ZERO);

        let report = resolve_endpoints([&mut ep], &scene);
        assert_eq!(report, ResolveReport { resolved: 1, frozen: 0 });
        assert_eq!(ep.position(), transform.transform_point3(Vec3::ONE));
    }

    #[test]
    fn test_edge_point_interpolates() {
        let scene = Single(cube(2.0, 2.0, 2.0), Mat4::IDENTITY);
        let (a, b) = scene.0.edge_endpoints(0).unwrap();
        let feature = FeatureRef::edge_point("m", 0, 0.25);
        let p = resolve_feature(&feature, &scene).unwrap();
        assert!(p.abs_diff_eq(a.lerp(b, 0.25), 1e-6));
    }

    #[test]
    fn test_stale_index_freezes() {
        let scene = Single(MeshData::point_cloud(vec![Vec3::ZERO; 3]), Mat4::IDENTITY);
        let last = Vec3::new(4.0, 5.0, 6.0);
        let mut ep = Endpoint::bound(FeatureRef::vertex("m", 4), last);
        let report = resolve_endpoints([&mut ep], &scene);
        assert_eq!(report.frozen, 1);
        assert_eq!(ep.position(), last);
    }

    #[test]
    fn test_missing_object_freezes() {
        let scene = Single(cube(1.0, 1.0, 1.0), Mat4::IDENTITY);
        let mut ep = Endpoint::bound(FeatureRef::vertex("gone", 0), Vec3::X);
        assert_eq!(resolve_endpoints([&mut ep], &scene).frozen, 1);
        assert_eq!(ep.position(), Vec3::X);
    }

    #[test]
    fn test_static_untouched() {
        let scene = Single(cube(1.0, 1.0, 1.0), Mat4::IDENTITY);
        let mut ep = Endpoint::Static(Vec3::splat(9.0));
        assert_eq!(resolve_endpoints([&mut ep], &scene), ResolveReport::default());
        assert_eq!(ep, Endpoint::Static(Vec3::splat(9.0)));
    }
}
