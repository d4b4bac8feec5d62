//! Node tick integration tests for playback lifecycle, completion,
//! deletion, and mirroring.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;

use rignode::engine::{EntityInstance, PlaybackEngine};
use rignode::events::playback::PlaybackFinished;
use rignode::node::AnimationNode;

const DT: f32 = 0.1;

/// Everything one scripted instance was asked to do.
#[derive(Default)]
struct InstanceLog {
    /// Millisecond values passed to `advance`, in call order.
    advances: Vec<f32>,
    renders: usize,
    triggers: usize,
    /// Every `set_mirror_scale` call, in call order.
    mirror: Vec<(f32, f32)>,
}

type SharedLog = Arc<Mutex<InstanceLog>>;
type EventTrail = Arc<Mutex<Vec<String>>>;

/// Instance whose time-ratio follows a pre-scripted sequence.
///
/// The ratio starts at 0.0; each advance with a positive delta pops the
/// next scripted value. Once the script runs dry the ratio holds, which
/// models an engine parked at its last keyframe.
struct ScriptedInstance {
    label: String,
    current: f32,
    script: VecDeque<f32>,
    log: SharedLog,
    events: EventTrail,
}

impl EntityInstance for ScriptedInstance {
    fn advance(&mut self, elapsed_ms: f32) {
        self.log.lock().unwrap().advances.push(elapsed_ms);
        self.events
            .lock()
            .unwrap()
            .push(format!("advance:{}", self.label));
        if elapsed_ms > 0.0 {
            if let Some(next) = self.script.pop_front() {
                self.current = next;
            }
        }
    }

    fn time_ratio(&self) -> f32 {
        self.current
    }

    fn evaluate_triggers(&mut self) {
        self.log.lock().unwrap().triggers += 1;
    }

    fn render(&mut self) {
        self.log.lock().unwrap().renders += 1;
    }

    fn set_mirror_scale(&mut self, sx: f32, sy: f32) {
        self.log.lock().unwrap().mirror.push((sx, sy));
    }
}

/// Engine producing scripted instances, one script per template name.
#[derive(Default)]
struct ScriptedEngine {
    scripts: FxHashMap<String, Vec<f32>>,
    logs: Arc<Mutex<Vec<SharedLog>>>,
    events: EventTrail,
}

impl ScriptedEngine {
    fn new() -> Self {
        Self::default()
    }

    fn with_script(mut self, template: &str, ratios: &[f32]) -> Self {
        self.scripts.insert(template.to_string(), ratios.to_vec());
        self
    }

    /// Per-instance logs, in creation order.
    fn logs(&self) -> Arc<Mutex<Vec<SharedLog>>> {
        self.logs.clone()
    }

    /// Interleaved advance/completion trail across all instances.
    fn events(&self) -> EventTrail {
        self.events.clone()
    }
}

impl PlaybackEngine for ScriptedEngine {
    fn instantiate(&mut self, template: &str) -> Option<Box<dyn EntityInstance>> {
        let script = self.scripts.get(template)?.clone();
        let log = SharedLog::default();
        self.logs.lock().unwrap().push(log.clone());
        Some(Box::new(ScriptedInstance {
            label: template.to_string(),
            current: 0.0,
            script: script.into(),
            log,
            events: self.events.clone(),
        }))
    }
}

fn make_node(engine: ScriptedEngine) -> AnimationNode {
    let mut node = AnimationNode::new(Box::new(engine));
    node.on_activate();
    node
}

fn completion_probe() -> (Arc<Mutex<usize>>, rignode::components::playback::CompleteFn) {
    let count = Arc::new(Mutex::new(0usize));
    let probe = count.clone();
    let callback = Box::new(move |_: &mut dyn EntityInstance| {
        *probe.lock().unwrap() += 1;
    });
    (count, callback)
}

// =============================================================================
// One-shot completion
// =============================================================================

#[test]
fn play_once_completes_on_ratio_wrap() {
    let engine = ScriptedEngine::new().with_script("burst", &[0.10, 0.50, 0.995, 0.02]);
    let logs = engine.logs();
    let mut node = make_node(engine);

    let (completions, callback) = completion_probe();
    let handle = node.play_once_with("burst", callback);
    assert!(handle.is_some());

    // Ticks 1-3: ratio climbs to 0.995, nothing completes.
    for _ in 0..3 {
        node.update(DT);
    }
    assert_eq!(*completions.lock().unwrap(), 0);
    assert_eq!(node.live_count(), 1);

    // Tick 4: ratio wraps 0.995 -> 0.02; the callback fires and the
    // instance sees neither triggers nor a render on its final tick.
    node.update(DT);
    assert_eq!(*completions.lock().unwrap(), 1);
    assert_eq!(node.live_count(), 0);

    let logs = logs.lock().unwrap();
    let log = logs[0].lock().unwrap();
    assert_eq!(log.renders, 3);
    assert_eq!(log.triggers, 3);
    assert_eq!(log.advances.len(), 4);

    // Tick 5: the instance is gone; no further effects of any kind.
    drop(log);
    drop(logs);
    node.update(DT);
    assert_eq!(*completions.lock().unwrap(), 1);
}

#[test]
fn play_once_completes_past_threshold_without_wrap() {
    // The ratio keeps increasing, but sitting past the near-completion
    // threshold is enough to finish on the following tick.
    let engine = ScriptedEngine::new().with_script("tail", &[0.995, 0.999]);
    let mut node = make_node(engine);

    let (completions, callback) = completion_probe();
    node.play_once_with("tail", callback);

    node.update(DT);
    assert_eq!(*completions.lock().unwrap(), 0);

    node.update(DT);
    assert_eq!(*completions.lock().unwrap(), 1);
    assert_eq!(node.live_count(), 0);
}

#[test]
fn repeat_playback_never_auto_completes() {
    // The script wraps twice; a looping playback must survive both wraps.
    let engine =
        ScriptedEngine::new().with_script("spin", &[0.4, 0.9, 0.2, 0.7, 0.995, 0.1, 0.5]);
    let logs = engine.logs();
    let mut node = make_node(engine);

    let finished = Arc::new(Mutex::new(0usize));
    let observed = finished.clone();
    node.world_mut()
        .add_observer(move |_trigger: On<PlaybackFinished>| {
            *observed.lock().unwrap() += 1;
        });
    node.world_mut().flush();

    node.play("spin");
    for _ in 0..10 {
        node.update(DT);
    }

    assert_eq!(node.live_count(), 1);
    assert_eq!(*finished.lock().unwrap(), 0);
    let logs = logs.lock().unwrap();
    let log = logs[0].lock().unwrap();
    assert_eq!(log.renders, 10);
    assert_eq!(log.triggers, 10);
}

// =============================================================================
// Deletion
// =============================================================================

#[test]
fn delete_entity_hides_instance_and_is_idempotent() {
    let engine = ScriptedEngine::new().with_script("spin", &[0.1, 0.2, 0.3, 0.4, 0.5]);
    let logs = engine.logs();
    let mut node = make_node(engine);

    let mut handle = node.play("spin");
    node.update(DT);
    assert_eq!(logs.lock().unwrap()[0].lock().unwrap().renders, 1);

    node.delete_entity(&mut handle);
    assert_eq!(handle, None);
    assert_eq!(node.live_count(), 0);

    // Deleted instances are invisible to every later tick.
    node.update(DT);
    node.update(DT);
    assert_eq!(logs.lock().unwrap()[0].lock().unwrap().renders, 1);

    // Deleting again through the cleared handle is a structural no-op.
    node.delete_entity(&mut handle);
    assert_eq!(handle, None);
}

#[test]
fn delete_after_completion_is_a_noop() {
    let engine = ScriptedEngine::new().with_script("burst", &[0.995, 0.01]);
    let mut node = make_node(engine);

    let mut handle = node.play_once("burst");
    node.update(DT);
    node.update(DT);
    assert_eq!(node.live_count(), 0);

    // The playback auto-removed itself; the stale handle deletes cleanly.
    node.delete_entity(&mut handle);
    assert_eq!(handle, None);
}

#[test]
fn deleting_sibling_does_not_affect_other_playbacks() {
    let engine = ScriptedEngine::new()
        .with_script("burst", &[0.3, 0.6, 0.995, 0.05])
        .with_script("spin", &[0.2, 0.4, 0.6, 0.8]);
    let mut node = make_node(engine);

    let (completions, callback) = completion_probe();
    let one_shot = node.play_once_with("burst", callback);
    let mut looping = node.play("spin");
    assert!(one_shot.is_some());
    assert_eq!(node.live_count(), 2);

    node.update(DT);
    node.delete_entity(&mut looping);
    assert_eq!(node.live_count(), 1);

    // The surviving one-shot still advances on its own schedule: tick 3
    // parks it at 0.995, tick 4 wraps and completes it.
    node.update(DT);
    node.update(DT);
    assert_eq!(*completions.lock().unwrap(), 0);
    node.update(DT);
    assert_eq!(*completions.lock().unwrap(), 1);
    assert_eq!(node.live_count(), 0);
}

// =============================================================================
// Mirroring
// =============================================================================

#[test]
fn mirror_applies_to_new_instance_before_first_tick() {
    let engine = ScriptedEngine::new().with_script("spin", &[0.1]);
    let logs = engine.logs();
    let mut node = make_node(engine);

    node.set_flipped_x(true);
    node.play("spin");

    // No update has run; creation alone must have mirrored the instance.
    let logs = logs.lock().unwrap();
    let log = logs[0].lock().unwrap();
    assert_eq!(log.mirror.last(), Some(&(-1.0, 1.0)));
    assert_eq!(log.advances.len(), 0);
}

#[test]
fn mirror_propagates_to_all_live_instances_and_reverts() {
    let engine = ScriptedEngine::new()
        .with_script("a", &[0.1, 0.2])
        .with_script("b", &[0.1, 0.2]);
    let logs = engine.logs();
    let mut node = make_node(engine);

    node.play("a");
    node.set_flipped_x(true);
    node.play("b");

    node.set_flipped_y(true);
    assert!(node.is_flipped_x());
    assert!(node.is_flipped_y());
    {
        let logs = logs.lock().unwrap();
        for log in logs.iter() {
            assert_eq!(log.lock().unwrap().mirror.last(), Some(&(-1.0, -1.0)));
        }
    }

    node.set_flipped_x(false);
    node.set_flipped_y(false);
    assert!(!node.is_flipped_x());
    assert!(!node.is_flipped_y());
    let logs = logs.lock().unwrap();
    for log in logs.iter() {
        assert_eq!(log.lock().unwrap().mirror.last(), Some(&(1.0, 1.0)));
    }
}

// =============================================================================
// Tick mechanics
// =============================================================================

#[test]
fn update_advances_by_delta_in_milliseconds() {
    let engine = ScriptedEngine::new().with_script("spin", &[0.1]);
    let logs = engine.logs();
    let mut node = make_node(engine);

    node.play("spin");
    node.update(0.25);

    let logs = logs.lock().unwrap();
    let log = logs[0].lock().unwrap();
    assert_eq!(log.advances, vec![250.0]);
}

#[test]
fn negative_or_non_finite_delta_advances_nothing() {
    let engine = ScriptedEngine::new().with_script("burst", &[0.995, 0.01]);
    let logs = engine.logs();
    let mut node = make_node(engine);

    let (completions, callback) = completion_probe();
    node.play_once_with("burst", callback);

    node.update(-1.0);
    node.update(f32::NAN);

    // The clock clamps bad deltas to zero, so the engine sees zero-length
    // advances, the ratio never moves, and nothing completes.
    let logs = logs.lock().unwrap();
    let log = logs[0].lock().unwrap();
    assert_eq!(log.advances, vec![0.0, 0.0]);
    drop(log);
    drop(logs);
    assert_eq!(*completions.lock().unwrap(), 0);
    assert_eq!(node.live_count(), 1);
}

#[test]
fn inactive_node_ignores_ticks() {
    let engine = ScriptedEngine::new().with_script("spin", &[0.1, 0.2]);
    let logs = engine.logs();
    let mut node = AnimationNode::new(Box::new(engine));

    node.play("spin");
    node.update(DT);
    assert_eq!(logs.lock().unwrap()[0].lock().unwrap().advances.len(), 0);

    node.on_activate();
    node.update(DT);
    assert_eq!(logs.lock().unwrap()[0].lock().unwrap().advances.len(), 1);

    node.on_deactivate();
    node.update(DT);
    assert_eq!(logs.lock().unwrap()[0].lock().unwrap().advances.len(), 1);
}

#[test]
fn instantiation_failure_returns_none_and_adds_nothing() {
    let engine = ScriptedEngine::new().with_script("known", &[0.1]);
    let mut node = make_node(engine);

    assert_eq!(node.play("unknown"), None);
    assert_eq!(node.play_once("unknown"), None);
    assert_eq!(node.live_count(), 0);

    // A failed creation leaves the node fully functional.
    node.update(DT);
    assert!(node.play("known").is_some());
    assert_eq!(node.live_count(), 1);
}

// =============================================================================
// Ordering and events
// =============================================================================

#[test]
fn all_instances_advance_before_any_completion_callback() {
    let engine = ScriptedEngine::new()
        .with_script("a", &[0.995, 0.01])
        .with_script("b", &[0.995, 0.01]);
    let events = engine.events();
    let mut node = make_node(engine);

    let trail_a = events.clone();
    node.play_once_with(
        "a",
        Box::new(move |_| trail_a.lock().unwrap().push("complete:a".to_string())),
    );
    let trail_b = events.clone();
    node.play_once_with(
        "b",
        Box::new(move |_| trail_b.lock().unwrap().push("complete:b".to_string())),
    );

    node.update(DT);
    node.update(DT);

    let events = events.lock().unwrap();
    let first_complete = events
        .iter()
        .position(|e| e.starts_with("complete"))
        .expect("both playbacks should have completed");
    assert!(events[..first_complete].iter().all(|e| e.starts_with("advance")));
    assert_eq!(
        events.iter().filter(|e| e.starts_with("advance")).count(),
        4
    );
    assert!(events.iter().any(|e| e == "complete:a"));
    assert!(events.iter().any(|e| e == "complete:b"));
}

#[test]
fn playback_finished_event_reaches_observers() {
    let engine = ScriptedEngine::new().with_script("burst", &[0.995, 0.01]);
    let mut node = make_node(engine);

    let seen = Arc::new(Mutex::new(None::<Entity>));
    let seen_clone = seen.clone();
    node.world_mut()
        .add_observer(move |trigger: On<PlaybackFinished>| {
            *seen_clone.lock().unwrap() = Some(trigger.event().entity);
        });
    node.world_mut().flush();

    let handle = node.play_once("burst");
    node.update(DT);
    assert_eq!(*seen.lock().unwrap(), None);

    node.update(DT);
    assert_eq!(*seen.lock().unwrap(), handle);
    assert_eq!(node.live_count(), 0);
}
