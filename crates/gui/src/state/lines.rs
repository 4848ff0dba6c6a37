//! Measurement segments and their endpoint bindings

use glam::Vec3;
use shared::{ObjectId, Rgba};
use uuid::Uuid;

use crate::error::{MeasureError, MeasureResult};

/// Which mesh element a live endpoint follows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureKind {
    Vertex(u32),
    /// Point at parameter `t` in [0, 1] along an edge
    EdgePoint { edge: u32, t: f32 },
}

/// Lookup key for a live anchor on a mesh.
///
/// Never owns the mesh; it is resolved against the current evaluated
/// geometry every time and may stop resolving after topology edits.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRef {
    pub mesh: ObjectId,
    pub kind: FeatureKind,
}

impl FeatureRef {
    pub fn vertex(mesh: impl Into<ObjectId>, index: u32) -> Self {
        Self {
            mesh: mesh.into(),
            kind: FeatureKind::Vertex(index),
        }
    }

    pub fn edge_point(mesh: impl Into<ObjectId>, edge: u32, t: f32) -> Self {
        Self {
            mesh: mesh.into(),
            kind: FeatureKind::EdgePoint { edge, t },
        }
    }

    pub fn is_vertex(&self) -> bool {
        matches!(self.kind, FeatureKind::Vertex(_))
    }
}

/// One end of a segment
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    Static(Vec3),
    Bound {
        feature: FeatureRef,
        /// Last successfully resolved world position
        last: Vec3,
    },
}

impl Endpoint {
    pub fn bound(feature: FeatureRef, position: Vec3) -> Self {
        Self::Bound {
            feature,
            last: position,
        }
    }

    /// Current world position (the cached one for bound endpoints)
    pub fn position(&self) -> Vec3 {
        match self {
            Self::Static(p) => *p,
            Self::Bound { last, .. } => *last,
        }
    }

    pub fn feature(&self) -> Option<&FeatureRef> {
        match self {
            Self::Static(_) => None,
            Self::Bound { feature, .. } => Some(feature),
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound { .. })
    }
}

/// A measurement line. Color and bindings live in the same record, so
/// removal can never leave them out of step.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: Uuid,
    pub start: Endpoint,
    pub end: Endpoint,
    /// Override for the default line color
    pub color: Option<Rgba>,
}

impl Segment {
    pub fn new(start: Endpoint, end: Endpoint) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            color: None,
        }
    }

    pub fn length(&self) -> f32 {
        self.start.position().distance(self.end.position())
    }

    pub fn midpoint(&self) -> Vec3 {
        (self.start.position() + self.end.position()) * 0.5
    }

    pub fn is_static(&self) -> bool {
        !self.start.is_bound() && !self.end.is_bound()
    }

    pub fn endpoints_mut(&mut self) -> [&mut Endpoint; 2] {
        [&mut self.start, &mut self.end]
    }
}

/// Ordered list of committed segments (insertion order)
#[derive(Debug, Clone, Default)]
pub struct LineModel {
    segments: Vec<Segment>,
}

impl LineModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, segment: Segment) -> usize {
        self.segments.push(segment);
        self.segments.len() - 1
    }

    /// Remove the segment at `index`; later segments shift down by one.
    /// The model is untouched on error.
    pub fn remove_at(&mut self, index: usize) -> MeasureResult<Segment> {
        if index >= self.segments.len() {
            return Err(MeasureError::out_of_range(index, self.segments.len()));
        }
        Ok(self.segments.remove(index))
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Segment> {
        let index = self.index_of(id)?;
        Some(self.segments.remove(index))
    }

    pub fn index_of(&self, id: Uuid) -> Option<usize> {
        self.segments.iter().position(|s| s.id == id)
    }

    pub fn set_color(&mut self, index: usize, color: Rgba) -> MeasureResult<()> {
        let len = self.segments.len();
        let segment = self
            .segments
            .get_mut(index)
            .ok_or(MeasureError::out_of_range(index, len))?;
        segment.color = Some(color);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Segment> {
        self.segments.iter_mut()
    }

    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }
}

impl<'a> IntoIterator for &'a LineModel {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x: f32) -> Segment {
        Segment::new(
            Endpoint::Static(Vec3::new(x, 0.0, 0.0)),
            Endpoint::Static(Vec3::new(x, 1.0, 0.0)),
        )
    }

    #[test]
    fn test_remove_at_shifts_following_segments() {
        let mut model = LineModel::new();
        let ids: Vec<Uuid> = (0..3)
            .map(|i| {
                let seg = line(i as f32);
                let id = seg.id;
                model.append(seg);
                id
            })
            .collect();
        model.set_color(2, [1.0, 0.0, 0.0, 1.0]).unwrap();

        let removed = model.remove_at(1).unwrap();
        assert_eq!(removed.id, ids[1]);
        assert_eq!(model.len(), 2);
        assert_eq!(model.get(1).unwrap().id, ids[2]);
        // Color travelled with its segment
        assert_eq!(model.get(1).unwrap().color, Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(model.get(0).unwrap().color, None);
    }

    #[test]
    fn test_remove_at_out_of_range_leaves_model_unchanged() {
        let mut model = LineModel::new();
        assert!(matches!(
            model.remove_at(0),
            Err(MeasureError::OutOfRange { index: 0, len: 0 })
        ));

        model.append(line(0.0));
        let before = model.as_slice().to_vec();
        assert!(model.remove_at(5).is_err());
        assert_eq!(model.as_slice(), before.as_slice());
    }

    #[test]
    fn test_set_color_out_of_range() {
        let mut model = LineModel::new();
        model.append(line(0.0));
        assert!(model.set_color(1, [0.0; 4]).is_err());
        assert_eq!(model.get(0).unwrap().color, None);
    }

    #[test]
    fn test_remove_by_id() {
        let mut model = LineModel::new();
        let seg = line(0.0);
        let id = seg.id;
        model.append(seg);
        model.append(line(1.0));
        assert!(model.remove(id).is_some());
        assert!(model.remove(id).is_none());
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_segment_length_and_binding() {
        let seg = Segment::new(
            Endpoint::Static(Vec3::ZERO),
            Endpoint::bound(FeatureRef::vertex("cube", 3), Vec3::new(3.0, 4.0, 0.0)),
        );
        assert!((seg.length() - 5.0).abs() < 1e-6);
        assert!(!seg.is_static());
        assert_eq!(seg.end.feature().unwrap().kind, FeatureKind::Vertex(3));
        assert!(seg.start.feature().is_none());
    }
}
