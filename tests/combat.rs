//! Integration tests for shots hitting craft, bodies and each other's
//! accounting: damage, cluster resolution, wormholes and black holes in
//! live flight.

mod common;

use bevy::math::DVec2;

use starduel::craft::{UFO_WIDTH, Ufo};
use starduel::projectile::{Projectile, ShotEvent, ShotKind};
use starduel::types::{CLUSTER_LASER_ANGLE, MAX_CLUSTER_LASER, PlayerId};
use starduel::vector::Polar;

#[test]
fn test_laser_at_speed_250_takes_a_quarter_shield() {
    let mut galaxy = common::galaxy_of(Vec::new());
    let tun = common::tunables();

    let mut target = Ufo::new(PlayerId::Two);
    target.pos = DVec2::new(700.0, 384.0);
    let crafts = [(PlayerId::Two, target.pos, UFO_WIDTH)];

    let mut shot = Projectile::new(ShotKind::Laser);
    shot.activate(DVec2::new(300.0, 384.0), DVec2::new(250.0, 0.0), &tun);

    'flight: for _ in 0..tun.max_flight_ticks {
        let tick = shot.advance(&mut galaxy, &crafts, &tun);
        for event in &tick.events {
            if let ShotEvent::CraftHit { player, damage } = event {
                assert_eq!(*player, PlayerId::Two);
                target.apply_damage(*damage);
                break 'flight;
            }
        }
        assert!(!tick.finished, "shot resolved without reaching the craft");
    }

    assert_eq!(target.shield, 75);
}

#[test]
fn test_cluster_timeout_fans_children_and_accounts_for_all_of_them() {
    let mut galaxy = common::galaxy_of(Vec::new());
    let tun = common::tunables();

    let mut shot = Projectile::new(ShotKind::Cluster);
    shot.activate(DVec2::new(200.0, 400.0), DVec2::new(120.0, 0.0), &tun);

    // Run the fuse out in an empty field.
    let mut burst_at = None;
    let mut ticks = 0u32;
    let finished_at = loop {
        let tick = shot.advance(&mut galaxy, &[], &tun);
        ticks += 1;

        if burst_at.is_none()
            && tick
                .events
                .iter()
                .any(|e| matches!(e, ShotEvent::ClusterBurst(_)))
        {
            burst_at = Some(ticks);

            // All children are airborne, fanned evenly around the
            // parent's heading (0 here), 30 degrees apart.
            let parts = shot.flight_parts();
            assert_eq!(parts.len(), MAX_CLUSTER_LASER);

            let mut angles: Vec<f64> = parts.iter().map(|p| p.vel.angle()).collect();
            angles.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let first = -CLUSTER_LASER_ANGLE * MAX_CLUSTER_LASER as f64 / 2.0;
            for (i, angle) in angles.iter().enumerate() {
                let expected = first + CLUSTER_LASER_ANGLE * i as f64;
                assert!(
                    (angle - expected).abs() < 1e-9,
                    "child {i}: {angle} != {expected}"
                );
            }
        }

        if tick.finished {
            break ticks;
        }
        assert!(ticks < tun.max_flight_ticks * 3, "cluster never resolved");
    };

    // The fuse burned for the full flight timer, the children for another
    // (their first step lands on the burst tick itself); the shot reports
    // active until parent plus children have all resolved.
    assert_eq!(burst_at, Some(tun.max_flight_ticks));
    assert_eq!(finished_at, tun.max_flight_ticks * 2 - 1);
}

#[test]
fn test_wormhole_teleports_a_live_shot_without_detonating_it() {
    let wormhole_pos = DVec2::new(500.0, 384.0);
    let exit = DVec2::new(200.0, -150.0);
    let mut galaxy = common::galaxy_of(vec![common::wormhole_at(wormhole_pos, exit)]);
    let tun = common::tunables();

    let mut shot = Projectile::new(ShotKind::Laser);
    shot.activate(DVec2::new(300.0, 384.0), DVec2::new(250.0, 0.0), &tun);

    let mut warped = false;
    for _ in 0..tun.max_flight_ticks {
        let tick = shot.advance(&mut galaxy, &[], &tun);
        for event in &tick.events {
            if let ShotEvent::Warped { to, .. } = event {
                warped = true;
                assert_eq!(*to, wormhole_pos + exit);
                assert!(shot.in_flight(), "warp must not end the flight");
            }
            assert!(
                !matches!(event, ShotEvent::Exploded(_)),
                "wormhole passage must not detonate"
            );
        }
        if tick.finished {
            break;
        }
    }

    assert!(warped, "the shot never reached the wormhole");
}

#[test]
fn test_blackhole_swallows_without_explosion_or_damage() {
    let hole_pos = DVec2::new(500.0, 384.0);
    let mut galaxy = common::galaxy_of(vec![common::blackhole_at(hole_pos)]);
    let tun = common::tunables();

    let mut bystander = Ufo::new(PlayerId::Two);
    bystander.pos = DVec2::new(900.0, 384.0);
    let crafts = [(PlayerId::Two, bystander.pos, UFO_WIDTH)];

    // Straight into the hole; the pull only accelerates the approach.
    let mut shot = Projectile::new(ShotKind::Laser);
    shot.activate(DVec2::new(300.0, 384.0), DVec2::new(200.0, 0.0), &tun);

    let mut swallowed = false;
    for _ in 0..tun.max_flight_ticks {
        let tick = shot.advance(&mut galaxy, &crafts, &tun);
        for event in &tick.events {
            match event {
                ShotEvent::Swallowed(_) => swallowed = true,
                ShotEvent::Exploded(_) => panic!("a swallowed shot must not explode"),
                ShotEvent::CraftHit { .. } => panic!("the shot never reached the craft"),
                _ => {}
            }
        }
        if tick.finished {
            break;
        }
    }

    assert!(swallowed);
    assert!(!shot.explosion.is_active());
}

#[test]
fn test_planet_impact_detonates_and_ends_the_shot() {
    let planet = common::bare_planet(DVec2::new(520.0, 384.0), 250.0, 100.0);
    let mut galaxy = common::galaxy_of(vec![planet]);
    let tun = common::tunables();

    let mut shot = Projectile::new(ShotKind::Heavy);
    shot.activate(DVec2::new(300.0, 384.0), DVec2::new(220.0, 0.0), &tun);

    let mut exploded = false;
    for _ in 0..tun.max_flight_ticks {
        let tick = shot.advance(&mut galaxy, &[], &tun);
        if tick
            .events
            .iter()
            .any(|e| matches!(e, ShotEvent::Exploded(_)))
        {
            exploded = true;
            assert!(tick.finished, "a detonated plain shot is resolved");
            break;
        }
    }

    assert!(exploded);
    assert!(shot.explosion.is_active());
    assert!(!shot.in_flight());
}
