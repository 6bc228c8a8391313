// arcflow-core playback navigation
// Copyright (C) 2021-2026  Daniel Lambert. Licensed under GPL-3.0-or-later, see /COPYING file for details
//! Pure traversal logic over the video queue (§4.1): no I/O, no time, no randomness
//! except through an explicit `shuffle_seed`.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::types::{NavigationDecision, QueueState, VideoId, PLAYBACK_HISTORY_CAP};

/// Produces a deterministic Fisher–Yates permutation of `videos`' identities, seeded by
/// `seed`. When `current_item_id` is present in the result, it is moved to the front.
///
/// Returns the empty sequence if `videos` is empty.
#[must_use]
pub fn generate_shuffle_order(
    videos: &[crate::types::VideoItem],
    current_item_id: Option<VideoId>,
    seed: u64,
) -> Vec<VideoId> {
    if videos.is_empty() {
        return Vec::new();
    }
    let mut ids: Vec<VideoId> = videos.iter().map(|v| v.id).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    ids.shuffle(&mut rng);

    if let Some(current) = current_item_id {
        if let Some(pos) = ids.iter().position(|&id| id == current) {
            if pos > 0 {
                ids.remove(pos);
                ids.insert(0, current);
            }
        }
    }
    ids
}

/// Computes the next traversal step and the queue update that follows from it (§4.1).
#[must_use]
pub fn compute_next(queue: &QueueState) -> (NavigationDecision, QueueState) {
    let Some(current) = queue.current_item_id else {
        return (NavigationDecision::Stop, queue.clone());
    };
    if queue.videos.is_empty() {
        return (NavigationDecision::Stop, queue.clone());
    }
    if queue.repeat_mode == crate::types::RepeatMode::One {
        return (NavigationDecision::AdvanceTo(current), queue.clone());
    }

    let order: Vec<VideoId> = if queue.shuffle_enabled {
        queue.shuffle_order.clone()
    } else {
        queue.videos.iter().map(|v| v.id).collect()
    };

    let Some(index) = order.iter().position(|&id| id == current) else {
        return (NavigationDecision::Stop, queue.clone());
    };

    let candidate = if index + 1 < order.len() {
        Some(order[index + 1])
    } else if queue.repeat_mode == crate::types::RepeatMode::All {
        order.first().copied()
    } else {
        None
    };

    let Some(candidate) = candidate else {
        return (NavigationDecision::Stop, queue.clone());
    };

    let mut next = queue.clone();
    next.playback_history.push_back(current);
    while next.playback_history.len() > PLAYBACK_HISTORY_CAP {
        next.playback_history.pop_front();
    }
    (NavigationDecision::AdvanceTo(candidate), next)
}

/// Computes the previous traversal step and the queue update that follows from it (§4.1).
#[must_use]
pub fn compute_prev(queue: &QueueState) -> (NavigationDecision, QueueState) {
    if queue.videos.is_empty() {
        return (NavigationDecision::NoOp, queue.clone());
    }
    let Some(current) = queue.current_item_id else {
        return (NavigationDecision::NoOp, queue.clone());
    };

    if queue.shuffle_enabled {
        let mut next = queue.clone();
        return match next.playback_history.pop_back() {
            None => (NavigationDecision::NoOp, queue.clone()),
            Some(previous) => (NavigationDecision::AdvanceTo(previous), next),
        };
    }

    let Some(index) = queue.videos.iter().position(|v| v.id == current) else {
        return (NavigationDecision::NoOp, queue.clone());
    };
    if index == 0 {
        (NavigationDecision::NoOp, queue.clone())
    } else {
        (
            NavigationDecision::AdvanceTo(queue.videos[index - 1].id),
            queue.clone(),
        )
    }
}

/// Repairs `shuffle_order`, `playback_history`, and the playback cursor after any
/// mutation that may have changed `videos` (§4.1). Idempotent.
#[must_use]
pub fn repair_playback_structures(mut queue: QueueState) -> QueueState {
    let existing: std::collections::HashSet<VideoId> =
        queue.videos.iter().map(|v| v.id).collect();

    queue.shuffle_order.retain(|id| existing.contains(id));
    queue.playback_history.retain(|id| existing.contains(id));

    if queue.shuffle_enabled && !queue.shuffle_order.is_empty() {
        let present: std::collections::HashSet<VideoId> =
            queue.shuffle_order.iter().copied().collect();
        for video in &queue.videos {
            if !present.contains(&video.id) {
                queue.shuffle_order.push(video.id);
            }
        }
    }

    while queue.playback_history.len() > PLAYBACK_HISTORY_CAP {
        queue.playback_history.pop_front();
    }

    if let Some(current) = queue.current_item_id {
        if !existing.contains(&current) {
            queue.current_item_id = None;
            queue.current_index = None;
        }
    }

    queue.current_index = queue
        .current_item_id
        .and_then(|id| queue.videos.iter().position(|v| v.id == id));
    if queue.current_index.is_none() {
        queue.current_item_id = None;
    }

    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::video;
    use crate::types::RepeatMode;

    fn queue_with(videos: Vec<crate::types::VideoItem>, current: usize) -> QueueState {
        let current_item_id = videos.get(current).map(|v| v.id);
        QueueState {
            videos,
            current_index: Some(current),
            current_item_id,
            ..QueueState::default()
        }
    }

    #[test]
    fn generate_shuffle_order_is_deterministic() {
        let videos = vec![video("a", 0), video("b", 1), video("c", 2), video("d", 3)];
        let a = generate_shuffle_order(&videos, None, 42);
        let b = generate_shuffle_order(&videos, None, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn generate_shuffle_order_is_a_permutation_and_fronts_current() {
        let videos = vec![video("a", 0), video("b", 1), video("c", 2), video("d", 3)];
        let current = videos[2].id;
        let order = generate_shuffle_order(&videos, Some(current), 7);
        assert_eq!(order.len(), videos.len());
        let mut sorted_order = order.clone();
        let mut sorted_ids: Vec<_> = videos.iter().map(|v| v.id).collect();
        sorted_order.sort();
        sorted_ids.sort();
        assert_eq!(sorted_order, sorted_ids);
        assert_eq!(order[0], current);
    }

    #[test]
    fn generate_shuffle_order_empty_queue() {
        assert!(generate_shuffle_order(&[], None, 1).is_empty());
    }

    #[test]
    fn compute_next_sequential_stops_at_end_with_repeat_off() {
        let videos = vec![video("a", 0), video("b", 1), video("c", 2)];
        let mut queue = queue_with(videos, 2);
        queue.repeat_mode = RepeatMode::Off;
        let (decision, _) = compute_next(&queue);
        assert_eq!(decision, NavigationDecision::Stop);
    }

    #[test]
    fn compute_next_sequential_wraps_with_repeat_all() {
        let videos = vec![video("a", 0), video("b", 1), video("c", 2)];
        let first_id = videos[0].id;
        let mut queue = queue_with(videos, 2);
        queue.repeat_mode = RepeatMode::All;
        let (decision, _) = compute_next(&queue);
        assert_eq!(decision, NavigationDecision::AdvanceTo(first_id));
    }

    #[test]
    fn compute_next_repeat_one_stays_without_history_push() {
        let videos = vec![video("a", 0), video("b", 1)];
        let current_id = videos[0].id;
        let mut queue = queue_with(videos, 0);
        queue.repeat_mode = RepeatMode::One;
        let (decision, next) = compute_next(&queue);
        assert_eq!(decision, NavigationDecision::AdvanceTo(current_id));
        assert!(next.playback_history.is_empty());
    }

    #[test]
    fn compute_prev_sequential_noop_at_start() {
        let videos = vec![video("a", 0), video("b", 1)];
        let queue = queue_with(videos, 0);
        let (decision, _) = compute_prev(&queue);
        assert_eq!(decision, NavigationDecision::NoOp);
    }

    #[test]
    fn compute_prev_shuffle_pops_history() {
        let videos = vec![video("a", 0), video("b", 1), video("c", 2)];
        let mut queue = queue_with(videos.clone(), 2);
        queue.shuffle_enabled = true;
        queue.playback_history.push_back(videos[0].id);
        queue.playback_history.push_back(videos[1].id);
        let (decision, next) = compute_prev(&queue);
        assert_eq!(decision, NavigationDecision::AdvanceTo(videos[1].id));
        assert_eq!(next.playback_history.len(), 1);
    }

    #[test]
    fn repair_drops_removed_ids_and_clears_cursor() {
        let videos = vec![video("a", 0), video("b", 1)];
        let removed_id = video("zzz", 9).id;
        let mut queue = queue_with(videos, 0);
        queue.shuffle_order = vec![queue.videos[0].id, removed_id, queue.videos[1].id];
        queue.playback_history.push_back(removed_id);
        queue.current_item_id = Some(removed_id);
        queue.current_index = Some(0);

        let repaired = repair_playback_structures(queue);
        assert!(!repaired.shuffle_order.contains(&removed_id));
        assert!(!repaired.playback_history.contains(&removed_id));
        assert!(repaired.current_item_id.is_none());
        assert!(repaired.current_index.is_none());
    }

    #[test]
    fn repair_is_idempotent() {
        let videos = vec![video("a", 0), video("b", 1), video("c", 2)];
        let mut queue = queue_with(videos, 1);
        queue.shuffle_enabled = true;
        queue.shuffle_order = vec![queue.videos[1].id, queue.videos[0].id];
        let once = repair_playback_structures(queue);
        let twice = repair_playback_structures(once.clone());
        assert_eq!(once, twice);
    }
}
