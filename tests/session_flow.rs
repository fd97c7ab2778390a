use glam::Vec2;
use treasure_hunt::{Tuning, TuningError};
use treasure_hunt::consts::SIM_DT;
use treasure_hunt::platform::PointerTracker;
use treasure_hunt::sim::{GameEvent, GamePhase, Group, Session, tick};

const VIEWPORT: Vec2 = Vec2::new(1000.0, 800.0);

/// Run until an outcome event shows up, feeding the tracker's buffered input
fn run_until_outcome(session: &mut Session, pointer: &mut PointerTracker, max_ticks: usize) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        tick(session, &pointer.take_input(), SIM_DT);
        events.extend(session.drain_events());
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::TreasureFound { .. } | GameEvent::ObstacleHit { .. }))
        {
            break;
        }
    }
    events
}

#[test]
fn test_holding_the_pointer_reaches_the_treasure() {
    let mut session = Session::new(11, VIEWPORT, Tuning::default()).unwrap();
    let mut pointer = PointerTracker::default();
    pointer.down(Vec2::new(900.0, 650.0));

    let events = run_until_outcome(&mut session, &mut pointer, 300);

    assert_eq!(events.first(), Some(&GameEvent::Started));
    assert!(!events.iter().any(|e| matches!(e, GameEvent::ObstacleHit { .. })));
    assert_eq!(
        &events[events.len() - 2..],
        &[
            GameEvent::TreasureFound {
                message: "You found the treasure!".to_string()
            },
            GameEvent::Restarted,
        ]
    );
    assert_eq!(session.phase(), GamePhase::Idle);
    assert_eq!(session.world.player.pos, Vec2::new(100.0, 650.0));
}

#[test]
fn test_falling_dog_ends_the_run_and_restarts_after_fade() {
    let tuning = Tuning {
        obstacle_start: [300.0, 560.0],
        ..Default::default()
    };
    let mut session = Session::new(12, VIEWPORT, tuning).unwrap();
    let mut pointer = PointerTracker::default();
    pointer.down(Vec2::new(900.0, 650.0));

    let events = run_until_outcome(&mut session, &mut pointer, 120);
    let hit = events
        .iter()
        .find_map(|e| match e {
            GameEvent::ObstacleHit { obstacle } => Some(*obstacle),
            _ => None,
        })
        .expect("dog never landed on the player");
    assert!(session.contains(hit));
    assert_eq!(session.phase(), GamePhase::Ending);

    // Releasing during the fade changes nothing about the outcome
    pointer.up(Vec2::new(900.0, 650.0));
    let mut tail = Vec::new();
    for _ in 0..60 {
        tick(&mut session, &pointer.take_input(), SIM_DT);
        tail.extend(session.drain_events());
        if session.phase() == GamePhase::Idle {
            break;
        }
    }

    assert_eq!(tail, vec![GameEvent::FadeComplete, GameEvent::Restarted]);
    assert!(!session.contains(hit));
    assert_eq!(session.restarts, 1);
    assert_eq!(session.prompt(), "CLICK the SCREEN TO BEGIN");
}

#[test]
fn test_next_playthrough_starts_on_next_press() {
    let mut session = Session::new(13, VIEWPORT, Tuning::default()).unwrap();
    session.restart();
    session.drain_events();
    assert_eq!(session.phase(), GamePhase::Idle);

    let mut pointer = PointerTracker::default();
    for _ in 0..5 {
        tick(&mut session, &pointer.take_input(), SIM_DT);
    }
    assert_eq!(session.phase(), GamePhase::Idle);

    pointer.down(Vec2::new(500.0, 400.0));
    tick(&mut session, &pointer.take_input(), SIM_DT);
    assert_eq!(session.drain_events(), vec![GameEvent::Started]);
    assert_eq!(session.phase(), GamePhase::Active);
}

#[test]
fn test_handlers_are_registered_once_in_order() {
    let session = Session::new(14, VIEWPORT, Tuning::default()).unwrap();
    let subs = session.subscriptions();
    assert_eq!(subs.pointer_down().len(), 1);
    assert_eq!(subs.pointer_up().len(), 1);

    let colliders: Vec<_> = subs.colliders().iter().map(|r| (r.moving, r.fixed)).collect();
    assert_eq!(
        colliders,
        vec![
            (Group::Player, Group::Platforms),
            (Group::Obstacles, Group::Platforms),
            (Group::Obstacles, Group::Bushes),
        ]
    );

    let overlaps: Vec<_> = subs.overlaps().iter().map(|r| (r.a, r.b)).collect();
    assert_eq!(overlaps, vec![(Group::Player, Group::Obstacles), (Group::Player, Group::Goal)]);
}

#[test]
fn test_unvalidated_tuning_is_rejected_at_construction() {
    // Deserializing directly skips Tuning::from_json's validation
    let inverted: Tuning = serde_json::from_str(r#"{"fall_speed_min": 120, "fall_speed_max": 60}"#).unwrap();
    assert!(matches!(
        Session::new(15, VIEWPORT, inverted),
        Err(TuningError::EmptyFallRange { min: 120, max: 60 })
    ));

    let crowded = Tuning {
        obstacle_spacing: 1e-30,
        ..Default::default()
    };
    assert!(matches!(
        Session::new(16, VIEWPORT, crowded),
        Err(TuningError::SpacingTooSmall(_))
    ));
}
