use serde::{Deserialize, Serialize};

use crate::ids::IdSource;
use crate::timeline::{ObjectInit, ObjectPatch, TimelineConfig, TimelineState, Track};

/// The closed set of mutations a timeline accepts.
///
/// Every mutation that references an id is a silent no-op when the id does
/// not resolve: stale dispatches (a double-fired UI event after an object was
/// already removed) change nothing and raise nothing.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub enum Action {
    AddTrack {
        name: String,
    },
    RemoveTrack {
        track_id: String,
    },
    UpdateTrackName {
        track_id: String,
        name: String,
    },
    AddObject {
        track_id: String,
        object: ObjectInit,
    },
    /// Fold of `AddObject` over a list, in order.
    AddObjects {
        track_id: String,
        objects: Vec<ObjectInit>,
    },
    RemoveObject {
        object_id: String,
    },
    UpdateObject {
        object_id: String,
        patch: ObjectPatch,
    },
    SelectObject {
        object_id: Option<String>,
    },
    SetZoom {
        level: f64,
    },
    SetScroll {
        position: f64,
    },
    /// Same-track move rewrites `start_time` in place. A cross-track move
    /// detaches from the source and appends to the destination, which must
    /// exist or the whole action is a no-op.
    MoveObject {
        object_id: String,
        new_start_time: f64,
        new_track_id: Option<String>,
    },
    /// Clone with a fresh id, offset one time unit later, same track.
    DuplicateObject {
        object_id: String,
    },
    ClearTrack {
        track_id: String,
    },
    ClearTimeline,
}

/// Applies one action to a state snapshot and returns the next snapshot.
/// Pure apart from consuming ids from `ids`; the input state is never
/// modified. An ineligible action returns a state equal to the input.
pub fn reduce(
    state: &TimelineState,
    config: &TimelineConfig,
    action: &Action,
    ids: &mut dyn IdSource,
) -> TimelineState {
    let mut next = state.clone();

    match action {
        Action::AddTrack { name } => {
            let id = ids.next_id("track");
            next.tracks.push(Track::new(id, name.clone()));
        }

        Action::RemoveTrack { track_id } => {
            if selection_is_on_track(&next, track_id) {
                next.selected_object_id = None;
            }
            next.tracks.retain(|track| track.id != *track_id);
        }

        Action::UpdateTrackName { track_id, name } => {
            if let Some(track) = next.track_by_id_mut(track_id) {
                track.name = name.clone();
            }
        }

        Action::AddObject { track_id, object } => {
            if let Some(track) = next.track_by_id_mut(track_id) {
                let id = ids.next_id("obj");
                track.objects.push(object.clone().into_object(id));
            }
        }

        Action::AddObjects { track_id, objects } => {
            if let Some(track) = next.track_by_id_mut(track_id) {
                for object in objects {
                    let id = ids.next_id("obj");
                    track.objects.push(object.clone().into_object(id));
                }
            }
        }

        Action::RemoveObject { object_id } => {
            if let Some(track) = next.find_track_by_object_mut(object_id) {
                track.objects.retain(|object| object.id != *object_id);
                if next.selected_object_id.as_deref() == Some(object_id) {
                    next.selected_object_id = None;
                }
            }
        }

        Action::UpdateObject { object_id, patch } => {
            if let Some(track) = next.find_track_by_object_mut(object_id) {
                if let Some(object) = track
                    .objects
                    .iter_mut()
                    .find(|object| object.id == *object_id)
                {
                    patch.apply(object);
                }
            }
        }

        Action::SelectObject { object_id } => {
            next.selected_object_id = object_id.clone();
        }

        Action::SetZoom { level } => {
            next.zoom_level = level.min(config.max_zoom).max(config.min_zoom);
        }

        Action::SetScroll { position } => {
            next.scroll_position = position.max(0.0);
        }

        Action::MoveObject {
            object_id,
            new_start_time,
            new_track_id,
        } => {
            let Some(source_index) = next
                .tracks
                .iter()
                .position(|track| track.contains_object(object_id))
            else {
                return next;
            };

            let dest_index = match new_track_id {
                Some(dest_id) if *dest_id != next.tracks[source_index].id => {
                    match next.tracks.iter().position(|track| track.id == *dest_id) {
                        Some(index) => Some(index),
                        // destination gone: leave the object where it is
                        None => return next,
                    }
                }
                _ => None,
            };

            if let Some(dest_index) = dest_index {
                let position = next.tracks[source_index]
                    .objects
                    .iter()
                    .position(|object| object.id == *object_id);
                if let Some(position) = position {
                    let mut object = next.tracks[source_index].objects.remove(position);
                    object.start_time = *new_start_time;
                    next.tracks[dest_index].objects.push(object);
                }
            } else if let Some(object) = next.tracks[source_index]
                .objects
                .iter_mut()
                .find(|object| object.id == *object_id)
            {
                object.start_time = *new_start_time;
            }
        }

        Action::DuplicateObject { object_id } => {
            if let Some(track) = next.find_track_by_object_mut(object_id) {
                if let Some(original) = track
                    .objects
                    .iter()
                    .find(|object| object.id == *object_id)
                    .cloned()
                {
                    let mut copy = original;
                    copy.id = ids.next_id("obj");
                    copy.start_time += 1.0;
                    track.objects.push(copy);
                }
            }
        }

        Action::ClearTrack { track_id } => {
            if selection_is_on_track(&next, track_id) {
                next.selected_object_id = None;
            }
            if let Some(track) = next.track_by_id_mut(track_id) {
                track.objects.clear();
            }
        }

        Action::ClearTimeline => {
            next.tracks.clear();
            next.selected_object_id = None;
        }
    }

    next
}

fn selection_is_on_track(state: &TimelineState, track_id: &str) -> bool {
    state
        .selected_object_id
        .as_deref()
        .and_then(|selected| state.find_track_by_object(selected))
        .is_some_and(|track| track.id == track_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIdSource;
    use crate::timeline::ObjectKind;

    struct Fixture {
        state: TimelineState,
        config: TimelineConfig,
        ids: SequentialIdSource,
    }

    impl Fixture {
        fn empty() -> Self {
            let config = TimelineConfig::default();
            Self {
                state: TimelineState::initial(&config),
                config,
                ids: SequentialIdSource::new(),
            }
        }

        fn apply(&mut self, action: Action) {
            self.state = reduce(&self.state, &self.config, &action, &mut self.ids);
        }

        /// One track named "Video" holding a duration object [10, 30].
        fn with_one_clip() -> (Self, String, String) {
            let mut fx = Self::empty();
            fx.apply(Action::AddTrack {
                name: "Video".to_string(),
            });
            let track_id = fx.state.tracks[0].id.clone();
            fx.apply(Action::AddObject {
                track_id: track_id.clone(),
                object: ObjectInit::duration(10.0, 20.0).with_property("name", "Clip"),
            });
            let object_id = fx.state.tracks[0].objects[0].id.clone();
            (fx, track_id, object_id)
        }
    }

    #[test]
    fn add_track_appends_with_fresh_id() {
        let mut fx = Fixture::empty();
        fx.apply(Action::AddTrack {
            name: "Video".to_string(),
        });
        fx.apply(Action::AddTrack {
            name: "Audio".to_string(),
        });

        assert_eq!(fx.state.track_count(), 2);
        assert_eq!(fx.state.tracks[0].id, "track_1");
        assert_eq!(fx.state.tracks[1].id, "track_2");
        assert_eq!(fx.state.tracks[1].name, "Audio");
        assert!(fx.state.tracks[0].objects.is_empty());
    }

    #[test]
    fn add_remove_track_round_trip_restores_count() {
        let (mut fx, track_id, object_id) = Fixture::with_one_clip();
        fx.apply(Action::SelectObject {
            object_id: Some(object_id),
        });

        fx.apply(Action::RemoveTrack {
            track_id: track_id.clone(),
        });

        assert_eq!(fx.state.track_count(), 0);
        // selection pointed into the removed track
        assert_eq!(fx.state.selected_object_id, None);
    }

    #[test]
    fn remove_track_keeps_unrelated_selection() {
        let (mut fx, _track_id, object_id) = Fixture::with_one_clip();
        fx.apply(Action::AddTrack {
            name: "Audio".to_string(),
        });
        let other_track = fx.state.tracks[1].id.clone();
        fx.apply(Action::SelectObject {
            object_id: Some(object_id.clone()),
        });

        fx.apply(Action::RemoveTrack {
            track_id: other_track,
        });

        assert_eq!(fx.state.selected_object_id, Some(object_id));
    }

    #[test]
    fn mutations_on_missing_ids_leave_state_unchanged() {
        let (mut fx, _track_id, _object_id) = Fixture::with_one_clip();
        let before = fx.state.clone();

        for action in [
            Action::RemoveTrack {
                track_id: "nope".to_string(),
            },
            Action::UpdateTrackName {
                track_id: "nope".to_string(),
                name: "x".to_string(),
            },
            Action::AddObject {
                track_id: "nope".to_string(),
                object: ObjectInit::instant(1.0),
            },
            Action::RemoveObject {
                object_id: "nope".to_string(),
            },
            Action::UpdateObject {
                object_id: "nope".to_string(),
                patch: ObjectPatch {
                    start_time: Some(99.0),
                    ..Default::default()
                },
            },
            Action::MoveObject {
                object_id: "nope".to_string(),
                new_start_time: 0.0,
                new_track_id: None,
            },
            Action::DuplicateObject {
                object_id: "nope".to_string(),
            },
            Action::ClearTrack {
                track_id: "nope".to_string(),
            },
        ] {
            fx.apply(action);
            assert_eq!(fx.state, before);
        }
    }

    #[test]
    fn remove_object_is_idempotent() {
        let (mut fx, _track_id, object_id) = Fixture::with_one_clip();

        fx.apply(Action::RemoveObject {
            object_id: object_id.clone(),
        });
        let after_first = fx.state.clone();
        fx.apply(Action::RemoveObject { object_id });

        assert_eq!(fx.state, after_first);
        assert_eq!(fx.state.object_count(), 0);
    }

    #[test]
    fn remove_object_clears_its_selection() {
        let (mut fx, _track_id, object_id) = Fixture::with_one_clip();
        fx.apply(Action::SelectObject {
            object_id: Some(object_id.clone()),
        });

        fx.apply(Action::RemoveObject { object_id });

        assert_eq!(fx.state.selected_object_id, None);
    }

    #[test]
    fn update_object_merges_shallowly() {
        let (mut fx, _track_id, object_id) = Fixture::with_one_clip();

        fx.apply(Action::UpdateObject {
            object_id: object_id.clone(),
            patch: ObjectPatch {
                start_time: Some(42.0),
                ..Default::default()
            },
        });

        let object = fx.state.find_object(&object_id).unwrap();
        assert_eq!(object.start_time, 42.0);
        assert_eq!(object.duration, Some(20.0));
        assert_eq!(object.display_name(), "Clip");
    }

    #[test]
    fn zoom_clamps_to_config_bounds() {
        let mut fx = Fixture::empty();

        fx.apply(Action::SetZoom { level: 0.05 });
        assert_eq!(fx.state.zoom_level, 0.1);

        fx.apply(Action::SetZoom { level: 20.0 });
        assert_eq!(fx.state.zoom_level, 10.0);

        fx.apply(Action::SetZoom { level: 2.5 });
        assert_eq!(fx.state.zoom_level, 2.5);
    }

    #[test]
    fn scroll_clamps_to_zero() {
        let mut fx = Fixture::empty();

        fx.apply(Action::SetScroll { position: -50.0 });
        assert_eq!(fx.state.scroll_position, 0.0);

        fx.apply(Action::SetScroll { position: 120.0 });
        assert_eq!(fx.state.scroll_position, 120.0);
    }

    #[test]
    fn move_within_track_rewrites_start_time() {
        let (mut fx, _track_id, object_id) = Fixture::with_one_clip();

        fx.apply(Action::MoveObject {
            object_id: object_id.clone(),
            new_start_time: 55.0,
            new_track_id: None,
        });

        let object = fx.state.find_object(&object_id).unwrap();
        assert_eq!(object.start_time, 55.0);
        assert_eq!(fx.state.tracks[0].objects.len(), 1);
    }

    #[test]
    fn move_between_tracks_detaches_and_appends() {
        let (mut fx, source_id, object_id) = Fixture::with_one_clip();
        fx.apply(Action::AddTrack {
            name: "Audio".to_string(),
        });
        let dest_id = fx.state.tracks[1].id.clone();

        fx.apply(Action::MoveObject {
            object_id: object_id.clone(),
            new_start_time: 20.0,
            new_track_id: Some(dest_id.clone()),
        });

        assert!(fx.state.track_by_id(&source_id).unwrap().objects.is_empty());
        let dest = fx.state.track_by_id(&dest_id).unwrap();
        assert_eq!(dest.objects.len(), 1);
        assert_eq!(dest.objects[0].id, object_id);
        assert_eq!(dest.objects[0].start_time, 20.0);
    }

    #[test]
    fn move_to_missing_track_is_a_no_op() {
        let (mut fx, _track_id, object_id) = Fixture::with_one_clip();
        let before = fx.state.clone();

        fx.apply(Action::MoveObject {
            object_id,
            new_start_time: 20.0,
            new_track_id: Some("nope".to_string()),
        });

        assert_eq!(fx.state, before);
    }

    #[test]
    fn move_to_own_track_behaves_like_same_track_move() {
        let (mut fx, track_id, object_id) = Fixture::with_one_clip();

        fx.apply(Action::MoveObject {
            object_id: object_id.clone(),
            new_start_time: 3.0,
            new_track_id: Some(track_id),
        });

        assert_eq!(fx.state.find_object(&object_id).unwrap().start_time, 3.0);
        assert_eq!(fx.state.object_count(), 1);
    }

    #[test]
    fn duplicate_offsets_start_and_keeps_properties() {
        let (mut fx, track_id, object_id) = Fixture::with_one_clip();

        fx.apply(Action::DuplicateObject { object_id });

        let track = fx.state.track_by_id(&track_id).unwrap();
        assert_eq!(track.objects.len(), 2);
        let copy = &track.objects[1];
        assert_ne!(copy.id, track.objects[0].id);
        assert_eq!(copy.start_time, 11.0);
        assert_eq!(copy.duration, Some(20.0));
        assert_eq!(copy.display_name(), "Clip");
    }

    #[test]
    fn batch_add_appends_in_order() {
        let mut fx = Fixture::empty();
        fx.apply(Action::AddTrack {
            name: "Video".to_string(),
        });
        let track_id = fx.state.tracks[0].id.clone();

        fx.apply(Action::AddObjects {
            track_id: track_id.clone(),
            objects: vec![
                ObjectInit::duration(0.0, 5.0),
                ObjectInit::instant(7.0),
                ObjectInit::duration(9.0, 1.0),
            ],
        });

        let track = fx.state.track_by_id(&track_id).unwrap();
        assert_eq!(track.objects.len(), 3);
        assert_eq!(track.objects[1].kind, ObjectKind::Instant);
        let ids: Vec<&str> = track.objects.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["obj_2", "obj_3", "obj_4"]);
    }

    #[test]
    fn clear_track_drops_objects_and_contained_selection() {
        let (mut fx, track_id, object_id) = Fixture::with_one_clip();
        fx.apply(Action::SelectObject {
            object_id: Some(object_id),
        });

        fx.apply(Action::ClearTrack {
            track_id: track_id.clone(),
        });

        assert!(fx.state.track_by_id(&track_id).unwrap().objects.is_empty());
        assert_eq!(fx.state.selected_object_id, None);
        assert_eq!(fx.state.track_count(), 1);
    }

    #[test]
    fn clear_timeline_empties_everything() {
        let (mut fx, _track_id, object_id) = Fixture::with_one_clip();
        fx.apply(Action::SelectObject {
            object_id: Some(object_id),
        });

        fx.apply(Action::ClearTimeline);

        assert_eq!(fx.state.track_count(), 0);
        assert_eq!(fx.state.selected_object_id, None);
        // view state survives a clear
        assert_eq!(fx.state.zoom_level, 1.0);
    }

    #[test]
    fn zoom_stays_in_bounds_for_arbitrary_levels() {
        use rand::Rng;

        let mut fx = Fixture::empty();
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let level: f64 = rng.gen_range(-1000.0..1000.0);
            fx.apply(Action::SetZoom { level });
            assert!(fx.state.zoom_level >= fx.config.min_zoom);
            assert!(fx.state.zoom_level <= fx.config.max_zoom);
        }
    }

    #[test]
    fn reduce_never_touches_the_input_state() {
        let (fx, _track_id, object_id) = Fixture::with_one_clip();
        let mut ids = SequentialIdSource::new();
        let before = fx.state.clone();

        let _ = reduce(
            &fx.state,
            &fx.config,
            &Action::RemoveObject { object_id },
            &mut ids,
        );

        assert_eq!(fx.state, before);
    }
}
