//! The 29 beats
//!
//! Each beat reads what earlier beats left in the context, mutates the
//! entities through their public operations, records its own derived values
//! and returns a payload. Draw order from the random source is part of the
//! behaviour: a seed reproduces a run only while this order holds.

use crate::core::random::RandomSource;
use crate::core::types::{sign, Vector3};
use crate::simulation::context::{Attachment, Stance, ThrowSolution, TrackingFocus, Trajectory};
use crate::simulation::outcome::{Beat, BeatPayload, Verdict};
use crate::simulation::sequencer::BeatSequencer;

/// Bomb proximity sensor range, meters
pub const PROXIMITY_THRESHOLD: f64 = 10.0;

/// The thrower stands opposite the bomb, this much further out
const THROWER_OFFSET: f64 = 1.2;
/// Ceiling on thrower tracking accuracy
const MAX_TRACKING_ACCURACY: f64 = 0.99;
/// Web speed before the random boost, m/s
const BASE_WEB_VELOCITY: f64 = 50.0;

impl<R: RandomSource> BeatSequencer<R> {
    pub(super) fn execute(&mut self, beat: Beat) -> BeatPayload {
        match beat {
            Beat::Ready => BeatPayload::Ready,
            Beat::Launch => self.launch(),
            Beat::DetectThreat => self.detect_threat(),
            Beat::ReadTrajectory => self.read_trajectory(),
            Beat::Stance => self.take_stance(),
            Beat::Evade => self.evade(),
            Beat::BombAdvance | Beat::CriticalPoint => self.advance_bomb(),
            Beat::TrackBomb => self.track_bomb(),
            Beat::Awareness => self.heighten_awareness(),
            Beat::Triangulate => self.triangulate(),
            Beat::Reconfirm => self.reconfirm(),
            Beat::ShootWeb => self.shoot_web(),
            Beat::WebConnection => self.confirm_web(),
            Beat::Tether => self.tether(),
            Beat::TetherStability => self.check_tether(),
            Beat::ReacquireTarget => self.reacquire_target(),
            Beat::TrackThrower => self.track_thrower(),
            Beat::TargetLock => self.lock_target(),
            Beat::ThrowSolution => self.solve_throw(),
            Beat::Swing => self.swing(),
            Beat::Release => self.release(),
            Beat::Return => self.estimate_return(),
            Beat::AdjustTrajectory => self.adjust_for_accuracy(),
            Beat::MaintainFocus => self.maintain_focus(),
            Beat::Proximity => self.sense_proximity(),
            Beat::FinalAdjustment => self.final_adjustment(),
            Beat::Detonation => self.detonate(),
            Beat::Impact => self.register_impact(),
        }
    }

    fn env(&self) -> f64 {
        self.config.environmental_factor
    }

    fn launch(&mut self) -> BeatPayload {
        self.bomb.launch(&self.config, &mut self.rng);
        BeatPayload::Launched {
            velocity: self.bomb.velocity,
            stability: self.bomb.stability,
        }
    }

    fn detect_threat(&mut self) -> BeatPayload {
        let detected = self
            .agent
            .detect_threat(self.bomb.position, self.env(), self.config.sense_threshold);
        self.context.threat_detected = detected;
        BeatPayload::ThreatDetected { detected }
    }

    fn read_trajectory(&mut self) -> BeatPayload {
        let trajectory = Trajectory {
            direction_degrees: self.bomb.velocity.heading_degrees(),
            speed: self.bomb.velocity.length(),
        };
        self.context.bomb_trajectory = trajectory;
        self.agent.adapt_to_situation(0.05);
        BeatPayload::Trajectory {
            direction_degrees: trajectory.direction_degrees,
            speed: trajectory.speed,
        }
    }

    fn take_stance(&mut self) -> BeatPayload {
        let stance = if self.context.threat_detected { Stance::Braced } else { Stance::Neutral };
        self.context.stance = stance;
        self.agent.adapt_to_situation(0.05);
        BeatPayload::Stance { stance }
    }

    fn evade(&mut self) -> BeatPayload {
        let velocity = self.bomb.velocity;
        let success = self.agent.dodge(velocity, self.env(), self.config.dodge_threshold);

        // Step away from the incoming direction
        let offset = Vector3::new(
            -sign(velocity.x) * self.rng.float_in(0.5, 1.5),
            -sign(velocity.y) * self.rng.float_in(0.5, 1.5),
            self.rng.float_in(-0.5, 0.5),
        );
        self.agent.reposition(offset);
        self.context.dodge_succeeded = success;
        self.agent.adapt_to_situation(0.1);

        BeatPayload::Dodge {
            success,
            position: self.agent.position,
        }
    }

    fn advance_bomb(&mut self) -> BeatPayload {
        self.bomb.advance(self.time_step, &mut self.rng);
        BeatPayload::BombMoved {
            position: self.bomb.position,
        }
    }

    fn track_bomb(&mut self) -> BeatPayload {
        let focus = if self.context.dodge_succeeded {
            TrackingFocus::Locked
        } else {
            TrackingFocus::Partial
        };
        self.context.tracking_focus = focus;
        self.agent.adapt_to_situation(0.05);
        BeatPayload::Tracking { focus }
    }

    fn heighten_awareness(&mut self) -> BeatPayload {
        let level = self.agent.spider_sense * self.env();
        self.context.awareness = level;
        self.agent.adapt_to_situation(0.05);
        BeatPayload::Awareness { level }
    }

    fn triangulate(&mut self) -> BeatPayload {
        let noise = Vector3::new(
            self.rng.float_in(-0.5, 0.5),
            self.rng.float_in(-0.5, 0.5),
            self.rng.float_in(-0.5, 0.5),
        );
        let position = self.bomb.position + noise;
        self.context.triangulated = position;
        self.agent.adapt_to_situation(0.1);
        BeatPayload::Coordinates { position }
    }

    fn reconfirm(&mut self) -> BeatPayload {
        let noise = Vector3::new(self.rng.jitter(0.2), self.rng.jitter(0.2), self.rng.jitter(0.2));
        let position = self.context.triangulated + noise;
        self.context.refined = position;
        self.agent.adapt_to_situation(0.05);
        BeatPayload::Coordinates { position }
    }

    fn shoot_web(&mut self) -> BeatPayload {
        let target = self.context.refined;
        // Experience covers for a poor shot; the roll only happens on a miss
        let hit = self.agent.shoot_web(target, self.env(), self.config.accuracy_threshold)
            || self.rng.next_unit() < self.agent.experience;
        let trajectory = Trajectory {
            direction_degrees: (target - self.agent.position).heading_degrees(),
            speed: BASE_WEB_VELOCITY + self.rng.float_in(0.0, 10.0),
        };

        self.context.web_hit = hit;
        self.context.web_trajectory = trajectory;
        self.agent.adapt_to_situation(0.1);

        BeatPayload::WebShot {
            hit,
            angle_degrees: trajectory.direction_degrees,
            velocity: trajectory.speed,
        }
    }

    fn confirm_web(&mut self) -> BeatPayload {
        let connected = self.context.web_hit || self.rng.next_unit() < self.agent.experience * 0.9;
        self.context.web_connected = connected;
        // A shaky connection teaches more
        self.agent.adapt_to_situation(if connected { 0.1 } else { 0.2 });
        BeatPayload::WebConnection { connected }
    }

    fn tether(&mut self) -> BeatPayload {
        let attachment = if self.context.web_connected {
            Attachment::Connected
        } else {
            Attachment::Glancing
        };
        self.context.attachment = attachment;
        self.bomb.tether_strain(&mut self.rng);
        BeatPayload::Tether {
            attachment,
            stability: self.bomb.stability,
        }
    }

    fn check_tether(&mut self) -> BeatPayload {
        let stable = self.context.attachment == Attachment::Connected
            || self.rng.next_unit() * self.agent.experience > 0.3;
        let tension_force = if stable {
            self.rng.int_in(50, 100)
        } else {
            self.rng.int_in(20, 50)
        };

        self.context.tether_stable = stable;
        self.context.tension_force = tension_force;
        self.agent.adapt_to_situation(0.05);

        BeatPayload::TetherStability { stable, tension_force }
    }

    fn reacquire_target(&mut self) -> BeatPayload {
        let thrower = Vector3::new(
            -self.bomb.position.x * THROWER_OFFSET,
            -self.bomb.position.y * THROWER_OFFSET,
            0.0,
        );
        let direction = thrower - self.agent.position;
        let distance = direction.length();

        self.context.thrower_position = thrower;
        self.context.direction_to_thrower = direction;
        self.context.distance_to_thrower = distance;
        self.agent.adapt_to_situation(0.05);

        BeatPayload::TargetDirection {
            direction: direction.normalize(),
            distance,
        }
    }

    fn track_thrower(&mut self) -> BeatPayload {
        let accuracy = (self.agent.experience * self.env()).min(MAX_TRACKING_ACCURACY);
        let tracked = self.gates.tracking || self.rng.next_unit() < accuracy;

        let spread = 1.0 - accuracy;
        let noise = Vector3::new(
            self.rng.jitter(spread * 10.0),
            self.rng.jitter(spread * 10.0),
            self.rng.jitter(spread * 5.0),
        );
        let estimate = self.context.thrower_position + noise;

        self.context.tracking_accuracy = accuracy;
        self.context.thrower_tracked = tracked;
        self.context.thrower_estimate = estimate;
        self.agent.adapt_to_situation(0.1);

        BeatPayload::ThrowerTracking { tracked, estimate }
    }

    fn lock_target(&mut self) -> BeatPayload {
        let precision = self.rng.float_in(0.9, 0.99);
        let engaged = self.gates.lock || (self.context.thrower_tracked && self.rng.next_unit() < precision);

        self.context.lock_precision = precision;
        self.context.target_locked = engaged;
        self.agent.adapt_to_situation(0.05);

        BeatPayload::TargetLock { engaged, precision }
    }

    fn solve_throw(&mut self) -> BeatPayload {
        let base_angle = self.context.direction_to_thrower.heading_degrees();
        // Capped before jitter, so the jittered force may exceed the cap by up to 10%
        let base_force = (self.config.force.max as f64)
            .min(self.context.distance_to_thrower * 2.0 * (0.8 + self.agent.experience * 0.2));

        let solution = ThrowSolution {
            angle_degrees: base_angle + self.rng.jitter(5.0),
            force: base_force * (0.9 + self.rng.next_unit() * 0.2),
        };
        self.context.throw_solution = solution;
        self.agent.adapt_to_situation(0.1);

        BeatPayload::ThrowSolution {
            angle_degrees: solution.angle_degrees,
            force: solution.force,
        }
    }

    fn swing(&mut self) -> BeatPayload {
        let ThrowSolution { angle_degrees, force } = self.context.throw_solution;
        let radians = angle_degrees.to_radians();
        let velocity = Vector3::new(
            force * radians.cos(),
            force * radians.sin(),
            self.rng.float_in(-5.0, 5.0),
        );
        let success = self.gates.swing || self.rng.next_unit() < self.agent.experience;

        self.context.swing_velocity = velocity;
        self.context.swing_succeeded = success;
        self.agent.adapt_to_situation(0.1);

        BeatPayload::Swing { success, velocity }
    }

    fn release(&mut self) -> BeatPayload {
        let released = self.gates.release || self.context.swing_succeeded;
        if released {
            self.bomb.release_with(self.context.swing_velocity);
        }
        self.context.released = released;
        BeatPayload::Release { released }
    }

    fn estimate_return(&mut self) -> BeatPayload {
        let seconds = self.context.distance_to_thrower / self.bomb.velocity.length();
        self.context.return_time = seconds;
        BeatPayload::ReturnEstimate { seconds }
    }

    fn adjust_for_accuracy(&mut self) -> BeatPayload {
        let factor = 0.9 + self.agent.experience * 0.2;
        self.bomb.adjust_trajectory(factor, &mut self.rng);
        self.context.accuracy_factor = factor;
        BeatPayload::VelocityAdjusted {
            factor,
            velocity: self.bomb.velocity,
        }
    }

    fn maintain_focus(&mut self) -> BeatPayload {
        self.context.focus_maintained = true;
        self.agent.adapt_to_situation(0.05);
        BeatPayload::Focus { maintained: true }
    }

    fn sense_proximity(&mut self) -> BeatPayload {
        let distance = self.context.thrower_position.distance(&self.bomb.position);
        let detected = self.gates.proximity || distance <= PROXIMITY_THRESHOLD;

        self.context.distance_to_target = distance;
        self.context.proximity_detected = detected;

        BeatPayload::Proximity { detected, distance }
    }

    fn final_adjustment(&mut self) -> BeatPayload {
        let factor = 0.95 + self.agent.experience * 0.1;
        self.bomb.adjust_trajectory(factor, &mut self.rng);
        self.context.final_factor = factor;
        BeatPayload::VelocityAdjusted {
            factor,
            velocity: self.bomb.velocity,
        }
    }

    fn detonate(&mut self) -> BeatPayload {
        let detonated = self.gates.detonation || self.context.proximity_detected;
        if detonated {
            self.bomb.detonate();
        }
        self.context.detonated = detonated;
        BeatPayload::Detonation { detonated }
    }

    fn register_impact(&mut self) -> BeatPayload {
        let victory_score = self.victory_score();
        self.context.victory_score = Some(victory_score);
        BeatPayload::Impact {
            victory_score,
            verdict: Verdict::Victorious,
        }
    }

    /// Experience and environment weighted by how much stability the bomb lost
    pub fn victory_score(&self) -> f64 {
        self.agent.experience * self.env() * (150.0 - self.bomb.stability) / 100.0
    }
}
