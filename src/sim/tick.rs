//! Fixed timestep simulation tick
//!
//! Order within a tick:
//! 1. pointer edges (press before release)
//! 2. idle pin: player velocity forced to zero
//! 3. integrate, then static colliders
//! 4. overlap handlers (active only)
//! 5. per-tick policy (obstacle fall resample, pointer facing)
//! 6. camera effects, which may run the fade continuation

use glam::Vec2;

use super::session::{GamePhase, Session};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer position, if it moved
    pub pointer: Option<Vec2>,
    /// Pointer went down since the last tick
    pub pressed: bool,
    /// Pointer went up since the last tick
    pub released: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) {
    session.time_ticks += 1;

    if let Some(pos) = input.pointer {
        session.pointer = pos;
    }
    let pos = session.pointer;
    if input.pressed {
        session.dispatch_pointer_down(pos);
    }
    if input.released {
        session.dispatch_pointer_up(pos);
    }

    if session.phase() == GamePhase::Idle {
        session.world.player.vel = Vec2::ZERO;
    }

    session.world.integrate(dt);
    session.run_colliders();
    session.dispatch_overlaps();
    session.update_started();
    session.update_camera(dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::events::GameEvent;
    use crate::sim::world::World;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    const VIEWPORT: Vec2 = Vec2::new(1000.0, 800.0);

    fn session(seed: u64) -> Session {
        Session::new(seed, VIEWPORT, Tuning::default()).unwrap()
    }

    fn press(at: Vec2) -> TickInput {
        TickInput {
            pointer: Some(at),
            pressed: true,
            ..Default::default()
        }
    }

    fn release() -> TickInput {
        TickInput {
            released: true,
            ..Default::default()
        }
    }

    /// Move every obstacle out of the player's way
    fn clear_obstacles(world: &mut World) {
        for (i, dog) in world.obstacles.iter_mut().enumerate() {
            dog.pos = Vec2::new(-10_000.0 - i as f32 * 100.0, -10_000.0);
        }
    }

    #[test]
    fn test_idle_until_first_press() {
        let mut s = session(1);
        assert_eq!(s.phase(), GamePhase::Idle);
        assert_eq!(s.prompt(), "CLICK the SCREEN TO BEGIN");

        tick(&mut s, &TickInput::default(), SIM_DT);
        assert_eq!(s.phase(), GamePhase::Idle);
        assert!(s.world.obstacles.iter().all(|o| o.vel == Vec2::ZERO));

        tick(&mut s, &press(Vec2::new(500.0, 400.0)), SIM_DT);
        assert_eq!(s.phase(), GamePhase::Active);
        assert!(s.is_started());
        assert_eq!(s.prompt(), "");
        assert_eq!(s.world.player.vel.x, 300.0);
        assert_eq!(s.drain_events(), vec![GameEvent::Started]);
    }

    #[test]
    fn test_second_press_does_not_restart_transition() {
        let mut s = session(2);
        clear_obstacles(&mut s.world);
        tick(&mut s, &press(Vec2::new(500.0, 400.0)), SIM_DT);
        tick(&mut s, &release(), SIM_DT);
        tick(&mut s, &press(Vec2::new(600.0, 400.0)), SIM_DT);

        let started = s
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::Started)
            .count();
        assert_eq!(started, 1);
        assert_eq!(s.world.player.vel.x, 300.0);
    }

    #[test]
    fn test_release_zeroes_velocity() {
        let mut s = session(3);
        clear_obstacles(&mut s.world);
        tick(&mut s, &press(Vec2::new(500.0, 400.0)), SIM_DT);
        let x = s.world.player.pos.x;
        tick(&mut s, &release(), SIM_DT);
        assert_eq!(s.world.player.vel.x, 0.0);
        tick(&mut s, &TickInput::default(), SIM_DT);
        assert_eq!(s.world.player.pos.x, x);
    }

    #[test]
    fn test_press_and_release_same_tick_ends_stopped() {
        let mut s = session(4);
        let input = TickInput {
            pointer: Some(Vec2::new(10.0, 10.0)),
            pressed: true,
            released: true,
        };
        tick(&mut s, &input, SIM_DT);
        assert_eq!(s.phase(), GamePhase::Active);
        assert_eq!(s.world.player.vel.x, 0.0);
    }

    #[test]
    fn test_player_faces_held_pointer() {
        let mut s = session(5);
        clear_obstacles(&mut s.world);
        tick(&mut s, &press(Vec2::new(100.0, 0.0)), SIM_DT);
        let player = &s.world.player;
        let expected = (0.0 - player.pos.y).atan2(100.0 - player.pos.x);
        assert!((player.rotation - expected).abs() < 1e-5);

        // Released: rotation stays where it was
        let before = s.world.player.rotation;
        tick(&mut s, &release(), SIM_DT);
        let moved = TickInput {
            pointer: Some(Vec2::new(900.0, 790.0)),
            ..Default::default()
        };
        tick(&mut s, &moved, SIM_DT);
        assert_eq!(s.world.player.rotation, before);
    }

    #[test]
    fn test_obstacle_hit_fades_then_restarts() {
        let mut s = session(6);
        tick(&mut s, &press(Vec2::new(500.0, 400.0)), SIM_DT);
        s.drain_events();
        let old_ids: Vec<_> = s.world.entity_ids().collect();

        // Drop a dog onto the player
        let player_pos = s.world.player.pos;
        s.world.obstacles[0].pos = player_pos;
        tick(&mut s, &TickInput::default(), SIM_DT);

        assert_eq!(s.phase(), GamePhase::Ending);
        assert!(s.is_started());
        assert!(s.camera.is_shaking());
        assert!(s.camera.is_fading());
        let events = s.drain_events();
        assert!(matches!(events[0], GameEvent::ObstacleHit { .. }));
        assert_eq!(events[1], GameEvent::ShakeStarted { duration: 0.5 });
        assert_eq!(events[2], GameEvent::FadeStarted { duration: 0.5 });
        assert_eq!(events.len(), 3);

        // Still overlapping, but no second outcome fires while fading
        let mut ticks = 0;
        while s.phase() == GamePhase::Ending {
            s.world.obstacles[0].pos = s.world.player.pos;
            tick(&mut s, &TickInput::default(), SIM_DT);
            ticks += 1;
            assert!(ticks < 120, "fade never completed");
        }
        assert!(ticks >= 28, "restart ran before the fade finished ({ticks} ticks)");

        let events = s.drain_events();
        assert_eq!(events, vec![GameEvent::FadeComplete, GameEvent::Restarted]);
        assert_eq!(s.phase(), GamePhase::Idle);
        assert_eq!(s.prompt(), "CLICK the SCREEN TO BEGIN");
        assert!(!s.camera.is_fading());
        assert!(old_ids.iter().all(|id| !s.contains(*id)));
    }

    #[test]
    fn test_treasure_restarts_immediately() {
        let mut s = session(7);
        clear_obstacles(&mut s.world);
        tick(&mut s, &press(Vec2::new(500.0, 400.0)), SIM_DT);
        s.drain_events();
        let old_goal = s.world.goal.id;

        s.world.player.pos = s.world.goal.pos;
        tick(&mut s, &TickInput::default(), SIM_DT);

        let events = s.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::TreasureFound {
                    message: "You found the treasure!".to_string()
                },
                GameEvent::Restarted,
            ]
        );
        assert_eq!(s.phase(), GamePhase::Idle);
        assert!(!s.camera.is_fading());
        assert!(!s.contains(old_goal));
        assert_eq!(s.restarts, 1);
    }

    #[test]
    fn test_obstacle_wins_over_treasure_in_same_tick() {
        let mut s = session(8);
        tick(&mut s, &press(Vec2::new(500.0, 400.0)), SIM_DT);
        s.drain_events();
        s.world.player.pos = s.world.goal.pos;
        s.world.obstacles[0].pos = s.world.goal.pos;
        tick(&mut s, &TickInput::default(), SIM_DT);

        let events = s.drain_events();
        assert!(matches!(events[0], GameEvent::ObstacleHit { .. }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::TreasureFound { .. })));
        assert_eq!(s.phase(), GamePhase::Ending);
    }

    #[test]
    fn test_idle_pins_player_even_when_held() {
        let mut s = session(9);
        clear_obstacles(&mut s.world);
        s.world.player.pos = s.world.goal.pos;
        tick(&mut s, &press(Vec2::new(500.0, 400.0)), SIM_DT);
        // Goal path restarts with the pointer still held
        assert_eq!(s.phase(), GamePhase::Idle);
        assert!(s.pointer_held);
        let start = s.world.player.pos;
        for _ in 0..10 {
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        assert_eq!(s.world.player.pos, start);
        assert_eq!(s.world.player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_restart_uses_resized_viewport() {
        let mut s = session(10);
        s.set_viewport(Vec2::new(1500.0, 800.0));
        assert_eq!(s.world.obstacles.len(), 4);
        s.restart();
        assert_eq!(s.world.obstacles.len(), 6);
        assert_eq!(s.world.viewport, Vec2::new(1500.0, 800.0));
    }

    #[test]
    fn test_determinism() {
        let mut a = session(99_999);
        let mut b = session(99_999);
        let inputs = [
            press(Vec2::new(300.0, 100.0)),
            TickInput::default(),
            TickInput {
                pointer: Some(Vec2::new(320.0, 90.0)),
                ..Default::default()
            },
            release(),
            TickInput::default(),
        ];
        for input in &inputs {
            tick(&mut a, input, SIM_DT);
            tick(&mut b, input, SIM_DT);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        for (x, y) in a.world.obstacles.iter().zip(&b.world.obstacles) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.vel, y.vel);
        }
        assert_eq!(a.world.player.pos, b.world.player.pos);
    }

    proptest! {
        #[test]
        fn prop_fall_speeds_stay_in_range(seed in any::<u64>(), ticks in 1usize..90) {
            let mut s = session(seed);
            clear_obstacles(&mut s.world);
            // Keep the player far from the goal
            s.world.goal.pos = Vec2::new(-50_000.0, -50_000.0);
            tick(&mut s, &press(Vec2::new(500.0, 400.0)), SIM_DT);
            for _ in 0..ticks {
                tick(&mut s, &TickInput::default(), SIM_DT);
                prop_assert_eq!(s.phase(), GamePhase::Active);
                for dog in &s.world.obstacles {
                    prop_assert!(dog.vel.y >= 50.0 && dog.vel.y <= 100.0);
                    prop_assert_eq!(dog.vel.y.fract(), 0.0);
                }
            }
        }
    }
}
