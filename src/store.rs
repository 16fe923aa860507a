//! Annotation store for a single survey task.
//!
//! [`Annotations`] is an immutable snapshot. Every operation returns a new
//! snapshot and leaves the receiver untouched, so observers can treat each
//! update as a value:
//!
//! - Collections are shared behind `Arc`s. An operation that does not touch a
//!   collection hands the very same allocation to the new snapshot.
//! - Entries are `Arc`s too. Only the entry being changed is rebuilt; every
//!   other entry is pointer-equal to its counterpart in the previous snapshot.
//! - An id → position index gives keyed lookup while the collections keep
//!   their creation order for rendering.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MARKER_POSITION;
use crate::error::AnnotationError;
use crate::model::{Marker, MarkerKind, PlotRange, Point};

/// Prefix for generated marker ids.
const MARKER_ID_PREFIX: &str = "mk";

/// Prefix for generated plot range ids.
const RANGE_ID_PREFIX: &str = "pr";

type Index = Arc<HashMap<String, usize>>;

/// Markers and plot ranges of one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "AnnotationsRecord", into = "AnnotationsRecord")]
pub struct Annotations {
    markers: Arc<Vec<Arc<Marker>>>,
    ranges: Arc<Vec<Arc<PlotRange>>>,
    marker_index: Index,
    range_index: Index,
    /// Counter for generating ids. Persisted so ids stay unique across sessions.
    next_seq: u64,
}

impl Default for Annotations {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Annotations {
    fn eq(&self, other: &Self) -> bool {
        self.markers == other.markers && self.ranges == other.ranges
    }
}

impl Annotations {
    pub fn new() -> Self {
        Self {
            markers: Arc::new(Vec::new()),
            ranges: Arc::new(Vec::new()),
            marker_index: Arc::new(HashMap::new()),
            range_index: Arc::new(HashMap::new()),
            next_seq: 1,
        }
    }

    /// Build a snapshot from plain collections (e.g. loaded from disk).
    pub fn from_parts(markers: Vec<Marker>, ranges: Vec<PlotRange>) -> Self {
        AnnotationsRecord {
            markers,
            ranges,
            next_seq: 0,
        }
        .into()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Markers in creation order.
    pub fn markers(&self) -> &[Arc<Marker>] {
        &self.markers
    }

    /// Plot ranges in creation order.
    pub fn ranges(&self) -> &[Arc<PlotRange>] {
        &self.ranges
    }

    /// Look up a marker by id.
    pub fn marker(&self, id: &str) -> Option<&Arc<Marker>> {
        self.marker_index.get(id).map(|&i| &self.markers[i])
    }

    /// Look up a plot range by id.
    pub fn range(&self, id: &str) -> Option<&Arc<PlotRange>> {
        self.range_index.get(id).map(|&i| &self.ranges[i])
    }

    /// The most recently created plot range.
    pub fn last_range(&self) -> Option<&Arc<PlotRange>> {
        self.ranges.last()
    }

    /// Whether both snapshots share the same marker collection allocation.
    pub fn shares_markers_with(&self, other: &Annotations) -> bool {
        Arc::ptr_eq(&self.markers, &other.markers)
    }

    /// Whether both snapshots share the same range collection allocation.
    pub fn shares_ranges_with(&self, other: &Annotations) -> bool {
        Arc::ptr_eq(&self.ranges, &other.ranges)
    }

    /// Whether both snapshots are the same value without comparing contents.
    pub fn is_same_snapshot(&self, other: &Annotations) -> bool {
        self.shares_markers_with(other) && self.shares_ranges_with(other)
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Append a marker at the default position. Returns the new snapshot and
    /// the generated id.
    pub fn add_marker(&self, kind: MarkerKind) -> (Self, String) {
        let (x, y) = DEFAULT_MARKER_POSITION;
        self.add_marker_at(kind, Point::new(x, y))
    }

    /// Append a marker at a given position (clamped to the image).
    pub fn add_marker_at(&self, kind: MarkerKind, position: Point) -> (Self, String) {
        let mut next = self.clone();
        let id = next.generate_id(MARKER_ID_PREFIX);

        let mut markers = Vec::with_capacity(self.markers.len() + 1);
        markers.extend(self.markers.iter().cloned());
        markers.push(Arc::new(Marker::new(id.clone(), kind, position.clamped())));

        let mut index = (*self.marker_index).clone();
        index.insert(id.clone(), markers.len() - 1);

        next.markers = Arc::new(markers);
        next.marker_index = Arc::new(index);
        (next, id)
    }

    /// Remove a marker.
    pub fn delete_marker(&self, id: &str) -> Result<Self, AnnotationError> {
        let &position = self
            .marker_index
            .get(id)
            .ok_or_else(|| AnnotationError::marker_not_found(id))?;

        let markers: Vec<Arc<Marker>> = self
            .markers
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != position)
            .map(|(_, m)| Arc::clone(m))
            .collect();

        let mut next = self.clone();
        next.marker_index = Arc::new(build_index(markers.iter().map(|m| m.id.as_str())));
        next.markers = Arc::new(markers);
        Ok(next)
    }

    /// Replace a marker's position. The stored position is always clamped to
    /// `[0, 100]`. Every other marker and the whole range collection are shared
    /// with the previous snapshot.
    pub fn move_marker(&self, id: &str, point: Point) -> Result<Self, AnnotationError> {
        let &position = self
            .marker_index
            .get(id)
            .ok_or_else(|| AnnotationError::marker_not_found(id))?;

        let mut markers = (*self.markers).clone();
        markers[position] = Arc::new(self.markers[position].moved_to(point.clamped()));

        let mut next = self.clone();
        next.markers = Arc::new(markers);
        Ok(next)
    }

    /// Append a new, empty plot range. This is the only way a range is created.
    pub fn start_range(&self) -> (Self, String) {
        let mut next = self.clone();
        let id = next.generate_id(RANGE_ID_PREFIX);

        let mut ranges = Vec::with_capacity(self.ranges.len() + 1);
        ranges.extend(self.ranges.iter().cloned());
        ranges.push(Arc::new(PlotRange::empty(id.clone())));

        let mut index = (*self.range_index).clone();
        index.insert(id.clone(), ranges.len() - 1);

        next.ranges = Arc::new(ranges);
        next.range_index = Arc::new(index);
        (next, id)
    }

    /// Append a vertex to the range with the given id.
    ///
    /// A missing range is a precondition violation: ranges are never deleted,
    /// so a handle that does not resolve points at a gating defect.
    pub fn append_point(&self, range_id: &str, point: Point) -> Result<Self, AnnotationError> {
        let &position = self.range_index.get(range_id).ok_or_else(|| {
            AnnotationError::precondition(format!("no plot range {range_id} to append to"))
        })?;
        Ok(self.replace_range_at(position, point))
    }

    /// Append a vertex to the last range in the collection.
    pub fn append_point_to_last_range(&self, point: Point) -> Result<Self, AnnotationError> {
        if self.ranges.is_empty() {
            return Err(AnnotationError::precondition(
                "no plot range to append to; start a range first",
            ));
        }
        Ok(self.replace_range_at(self.ranges.len() - 1, point))
    }

    fn replace_range_at(&self, position: usize, point: Point) -> Self {
        let mut ranges = (*self.ranges).clone();
        ranges[position] = Arc::new(self.ranges[position].with_point(point));

        let mut next = self.clone();
        next.ranges = Arc::new(ranges);
        next
    }

    /// Generate an id not yet used by any marker or range.
    fn generate_id(&mut self, prefix: &str) -> String {
        loop {
            let id = format!("{}-{}", prefix, self.next_seq);
            self.next_seq += 1;
            if !self.marker_index.contains_key(&id) && !self.range_index.contains_key(&id) {
                return id;
            }
        }
    }
}

fn build_index<'a>(ids: impl Iterator<Item = &'a str>) -> HashMap<String, usize> {
    ids.enumerate().map(|(i, id)| (id.to_string(), i)).collect()
}

/// On-disk shape of [`Annotations`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotationsRecord {
    #[serde(default)]
    markers: Vec<Marker>,
    #[serde(default)]
    ranges: Vec<PlotRange>,
    #[serde(default)]
    next_seq: u64,
}

impl From<AnnotationsRecord> for Annotations {
    fn from(record: AnnotationsRecord) -> Self {
        let marker_index = build_index(record.markers.iter().map(|m| m.id.as_str()));
        let range_index = build_index(record.ranges.iter().map(|r| r.id.as_str()));
        if marker_index.len() != record.markers.len() || range_index.len() != record.ranges.len() {
            log::warn!("Loaded annotations contain duplicate ids; lookups resolve to the last one");
        }
        Self {
            markers: Arc::new(record.markers.into_iter().map(Arc::new).collect()),
            ranges: Arc::new(record.ranges.into_iter().map(Arc::new).collect()),
            marker_index: Arc::new(marker_index),
            range_index: Arc::new(range_index),
            next_seq: record.next_seq.max(1),
        }
    }
}

impl From<Annotations> for AnnotationsRecord {
    fn from(annotations: Annotations) -> Self {
        Self {
            markers: annotations.markers.iter().map(|m| (**m).clone()).collect(),
            ranges: annotations.ranges.iter().map(|r| (**r).clone()).collect(),
            next_seq: annotations.next_seq,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn store_with_markers(kinds: &[MarkerKind]) -> (Annotations, Vec<String>) {
        let mut store = Annotations::new();
        let mut ids = Vec::new();
        for &kind in kinds {
            let (next, id) = store.add_marker(kind);
            store = next;
            ids.push(id);
        }
        (store, ids)
    }

    #[test]
    fn test_add_marker_unique_ids_and_kinds() {
        let kinds = [
            MarkerKind::Well,
            MarkerKind::Inlet,
            MarkerKind::Well,
            MarkerKind::SeriesInlet,
            MarkerKind::Sample,
            MarkerKind::Well,
        ];
        let (store, ids) = store_with_markers(&kinds);

        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), kinds.len());
        for (marker, kind) in store.markers().iter().zip(kinds) {
            assert_eq!(marker.kind, kind);
        }
    }

    #[test]
    fn test_add_marker_default_position() {
        let (store, ids) = store_with_markers(&[MarkerKind::Well, MarkerKind::Well]);
        assert_ne!(ids[0], ids[1]);
        for marker in store.markers() {
            assert_eq!(marker.kind, MarkerKind::Well);
            assert_eq!(marker.position, Point::new(50.0, 50.0));
        }
    }

    #[test]
    fn test_operations_leave_receiver_untouched() {
        let (store, ids) = store_with_markers(&[MarkerKind::Inlet]);
        let moved = store.move_marker(&ids[0], Point::new(10.0, 20.0)).unwrap();
        assert_eq!(store.markers()[0].position, Point::new(50.0, 50.0));
        assert_eq!(moved.markers()[0].position, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_move_marker_shares_untouched_entries() {
        let (store, ids) =
            store_with_markers(&[MarkerKind::Well, MarkerKind::Inlet, MarkerKind::Sample]);
        let (store, range_id) = store.start_range();
        let store = store.append_point(&range_id, Point::new(1.0, 2.0)).unwrap();

        let moved = store.move_marker(&ids[1], Point::new(30.0, 40.0)).unwrap();

        assert!(Arc::ptr_eq(&store.markers()[0], &moved.markers()[0]));
        assert!(!Arc::ptr_eq(&store.markers()[1], &moved.markers()[1]));
        assert!(Arc::ptr_eq(&store.markers()[2], &moved.markers()[2]));
        assert!(moved.shares_ranges_with(&store));
        assert!(!moved.shares_markers_with(&store));

        let target = moved.marker(&ids[1]).unwrap();
        assert_eq!(target.position, Point::new(30.0, 40.0));
        assert_eq!(target.kind, MarkerKind::Inlet);
        assert_eq!(target.id, ids[1]);
    }

    #[test]
    fn test_move_marker_clamps_out_of_range() {
        let (store, ids) = store_with_markers(&[MarkerKind::Well]);
        for point in [
            Point::new(120.0, 50.0),
            Point::new(-40.0, 300.0),
            Point::new(f32::MAX, f32::MIN),
        ] {
            let moved = store.move_marker(&ids[0], point).unwrap();
            assert!(moved.marker(&ids[0]).unwrap().position.is_within_bounds());
        }
        let moved = store.move_marker(&ids[0], Point::new(120.0, 50.0)).unwrap();
        assert_eq!(moved.marker(&ids[0]).unwrap().position, Point::new(100.0, 50.0));
    }

    #[test]
    fn test_move_missing_marker_is_not_found() {
        let (store, _) = store_with_markers(&[MarkerKind::Well]);
        let err = store.move_marker("mk-999", Point::new(1.0, 1.0)).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_delete_marker_reindexes() {
        let (store, ids) =
            store_with_markers(&[MarkerKind::Well, MarkerKind::Inlet, MarkerKind::Sample]);
        let store = store.delete_marker(&ids[0]).unwrap();

        assert_eq!(store.markers().len(), 2);
        assert!(store.marker(&ids[0]).is_none());
        assert_eq!(store.marker(&ids[2]).unwrap().kind, MarkerKind::Sample);

        let moved = store.move_marker(&ids[2], Point::new(5.0, 5.0)).unwrap();
        assert_eq!(moved.markers()[1].position, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_delete_missing_marker_reports_not_found() {
        let store = Annotations::new();
        assert_eq!(
            store.delete_marker("mk-1"),
            Err(AnnotationError::marker_not_found("mk-1"))
        );
    }

    #[test]
    fn test_deleted_ids_are_not_reused() {
        let (store, ids) = store_with_markers(&[MarkerKind::Well]);
        let store = store.delete_marker(&ids[0]).unwrap();
        let (_, new_id) = store.add_marker(MarkerKind::Well);
        assert_ne!(new_id, ids[0]);
    }

    #[test]
    fn test_start_range_then_append_in_order() {
        let (store, first) = Annotations::new().start_range();
        let store = store.append_point(&first, Point::new(5.0, 5.0)).unwrap();

        let (store, second) = store.start_range();
        let before = Arc::clone(&store.ranges()[0]);
        let points = [
            Point::new(10.0, 10.0),
            Point::new(90.0, 10.0),
            Point::new(90.0, 90.0),
            Point::new(10.0, 90.0),
        ];
        let mut store = store;
        for p in points {
            store = store.append_point(&second, p).unwrap();
        }

        assert_eq!(store.ranges().len(), 2);
        assert_eq!(store.range(&second).unwrap().points, points.to_vec());
        assert!(Arc::ptr_eq(&before, &store.ranges()[0]));
    }

    #[test]
    fn test_append_point_to_last_range() {
        let (store, _) = Annotations::new().start_range();
        let (store, last) = store.start_range();
        let store = store.append_point_to_last_range(Point::new(3.0, 4.0)).unwrap();
        assert_eq!(store.range(&last).unwrap().points, vec![Point::new(3.0, 4.0)]);
        assert!(store.ranges()[0].is_empty());
    }

    #[test]
    fn test_append_without_range_is_precondition_violation() {
        let store = Annotations::new();
        assert!(matches!(
            store.append_point_to_last_range(Point::new(1.0, 1.0)),
            Err(AnnotationError::PreconditionViolated(_))
        ));
        assert!(matches!(
            store.append_point("pr-1", Point::new(1.0, 1.0)),
            Err(AnnotationError::PreconditionViolated(_))
        ));
    }

    #[test]
    fn test_range_updates_share_markers() {
        let (store, _) = store_with_markers(&[MarkerKind::Well]);
        let (started, id) = store.start_range();
        assert!(started.shares_markers_with(&store));
        let appended = started.append_point(&id, Point::new(1.0, 1.0)).unwrap();
        assert!(appended.shares_markers_with(&store));
    }

    #[test]
    fn test_json_roundtrip_keeps_id_counter() {
        let (store, ids) = store_with_markers(&[MarkerKind::Well, MarkerKind::Sample]);
        let (store, range_id) = store.start_range();
        let store = store.append_point(&range_id, Point::new(12.0, 34.0)).unwrap();

        let json = serde_json::to_string(&store).unwrap();
        let loaded: Annotations = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, store);
        assert_eq!(loaded.marker(&ids[1]).unwrap().kind, MarkerKind::Sample);

        let (_, fresh) = loaded.add_marker(MarkerKind::Inlet);
        assert!(!ids.contains(&fresh));
        assert_ne!(fresh, range_id);
    }

    #[test]
    fn test_loaded_ids_without_counter_do_not_collide() {
        let store = Annotations::from_parts(
            vec![Marker::new("mk-1", MarkerKind::Well, Point::new(1.0, 1.0))],
            vec![PlotRange::empty("pr-2")],
        );
        let (store, marker_id) = store.add_marker(MarkerKind::Inlet);
        let (_, range_id) = store.start_range();
        assert_ne!(marker_id, "mk-1");
        assert_ne!(range_id, "pr-2");
    }
}
