//! A minimal stand-in for the transport engine: straight-line tracks
//! through a layered slab calorimeter, with primaries that may radiate
//! photons in the absorber. It produces steps of the right shape for the
//! sensitive detectors; it is not a physics model.
use crate::step::{Step, StepPoint, Track};
use crate::vector::ThreeVector;
use crate::{Config, Float};
use anyhow::{Context, Result};
use rand::prelude::*;
use rand_distr::OpenClosed01;
use rand_distr::Standard;
use rand_distr::StandardNormal;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Volume {
    World,
    Absorber,
    Gap,
}

/// `n_layers` layers of absorber followed by gap, stacked along z and
/// centred on the origin.
#[derive(Clone, Debug)]
pub struct Calorimeter {
    pub n_layers: usize,
    pub absorber_thickness: Float,
    pub gap_thickness: Float,
}

impl Calorimeter {
    pub fn layer_thickness(&self) -> Float {
        self.absorber_thickness + self.gap_thickness
    }

    pub fn thickness(&self) -> Float {
        self.n_layers as Float * self.layer_thickness()
    }

    pub fn front(&self) -> Float {
        -0.5 * self.thickness()
    }

    pub fn back(&self) -> Float {
        0.5 * self.thickness()
    }

    pub fn volume_at(&self, z: Float) -> Volume {
        if z < self.front() || z >= self.back() {
            return Volume::World;
        }
        let in_layer = (z - self.front()) % self.layer_thickness();
        if in_layer < self.absorber_thickness {
            Volume::Absorber
        } else {
            Volume::Gap
        }
    }

    /// Every slab edge from front to back.
    pub fn boundaries(&self) -> Vec<Float> {
        let mut edges = Vec::with_capacity(2 * self.n_layers + 1);
        for i in 0..self.n_layers {
            let start = self.front() + i as Float * self.layer_thickness();
            edges.push(start);
            edges.push(start + self.absorber_thickness);
        }
        edges.push(self.back());
        edges
    }
}

pub fn particle_mass(name: &str) -> Option<Float> {
    // MeV
    match name {
        "e-" | "e+" => Some(0.510_998_95),
        "gamma" => Some(0.0),
        "mu-" | "mu+" => Some(105.658_375_5),
        "pi-" | "pi+" => Some(139.570_39),
        "proton" => Some(938.272_088),
        _ => None,
    }
}

fn radiates(name: &str) -> bool {
    matches!(name, "e-" | "e+")
}

/// Shoots one primary per event from upstream of the calorimeter.
#[derive(Clone, Debug)]
pub struct ParticleGun {
    pub particle: String,
    /// kinetic energy
    pub energy: Float,
    pub position_sigma: Float,
    pub angular_sigma: Float,
}

impl ParticleGun {
    pub fn momentum(&self) -> Result<Float> {
        let mass = particle_mass(&self.particle)
            .with_context(|| format!("Unknown particle `{}`", self.particle))?;
        Ok((self.energy * (self.energy + 2.0 * mass)).sqrt())
    }
}

/// Direction with the given slopes dx/dz and dy/dz. Always points
/// downstream.
fn direction_from_slopes(slope_x: Float, slope_y: Float) -> ThreeVector {
    ThreeVector::new(slope_x, slope_y, 1.0).unit()
}

struct Pending {
    track: Track,
    position: ThreeVector,
    direction: ThreeVector,
    momentum: Float,
}

pub struct Transport {
    pub calorimeter: Calorimeter,
    pub gun: ParticleGun,
    pub brem_probability: Float,
    /// gap between the world edge and the calorimeter front
    pub world_margin: Float,
}

impl Transport {
    pub fn new(cfg: &Config) -> Transport {
        Transport {
            calorimeter: Calorimeter {
                n_layers: cfg.detector.n_layers,
                absorber_thickness: cfg.detector.absorber_thickness,
                gap_thickness: cfg.detector.gap_thickness,
            },
            gun: ParticleGun {
                particle: cfg.gun.particle.clone(),
                energy: cfg.gun.energy,
                position_sigma: cfg.gun.position_sigma,
                angular_sigma: cfg.gun.angular_sigma,
            },
            brem_probability: cfg.gun.brem_probability,
            world_margin: 10.0,
        }
    }

    /// Tracks one event. `dispatch` sees every step that starts inside
    /// the calorimeter, together with the volume it starts in, in the
    /// order the steps are taken. Secondaries are tracked after their
    /// parent, last created first.
    pub fn transport_event<R, F>(&self, rng: &mut R, mut dispatch: F) -> Result<()>
    where
        R: Rng,
        F: FnMut(&Step, Volume) -> Result<()>,
    {
        let p = self.gun.momentum()?;
        let sigma_pos = self.gun.position_sigma;
        let sigma_ang = self.gun.angular_sigma;
        let gx: Float = rng.sample(StandardNormal);
        let gy: Float = rng.sample(StandardNormal);
        let ax: Float = rng.sample(StandardNormal);
        let ay: Float = rng.sample(StandardNormal);

        let mut stack = vec![Pending {
            track: Track::primary(1, &self.gun.particle),
            position: ThreeVector::new(
                gx * sigma_pos,
                gy * sigma_pos,
                self.calorimeter.front() - self.world_margin,
            ),
            direction: direction_from_slopes(
                (ax * sigma_ang).tan(),
                (ay * sigma_ang).tan(),
            ),
            momentum: p,
        }];
        let mut next_track_id = 2;

        while let Some(pending) = stack.pop() {
            let secondaries =
                self.track_particle(rng, pending, &mut next_track_id, &mut dispatch)?;
            // reversed so the first secondary ends up on top
            stack.extend(secondaries.into_iter().rev());
        }
        Ok(())
    }

    fn track_particle<R, F>(
        &self,
        rng: &mut R,
        pending: Pending,
        next_track_id: &mut i32,
        dispatch: &mut F,
    ) -> Result<Vec<Pending>>
    where
        R: Rng,
        F: FnMut(&Step, Volume) -> Result<()>,
    {
        let Pending {
            track,
            mut position,
            direction,
            mut momentum,
        } = pending;
        let mut secondaries = Vec::new();

        for edge in self.calorimeter.boundaries() {
            if edge <= position.z {
                continue;
            }
            let volume = self.calorimeter.volume_at(0.5 * (position.z + edge));

            let mut target = edge;
            let mut brem = false;
            if volume == Volume::Absorber && radiates(&track.particle_name) {
                let r: Float = rng.sample(Standard);
                if r < self.brem_probability {
                    // never 0, an emission can't sit on the slab entrance
                    let u: Float = rng.sample(OpenClosed01);
                    target = position.z + u * (edge - position.z);
                    brem = true;
                }
            }

            let mut end = position + direction * ((target - position.z) / direction.z);
            end.z = target;
            let pre = StepPoint::new(position, direction * momentum);

            if brem {
                let fraction: Float = 0.05 + 0.45 * rng.sample::<Float, _>(Standard);
                let photon_p = fraction * momentum;
                momentum -= photon_p;
                let post =
                    StepPoint::new(end, direction * momentum).with_process("eBrem");
                dispatch(&Step::new(&track, pre, post), volume)?;

                let kx: Float = rng.sample(StandardNormal);
                let ky: Float = rng.sample(StandardNormal);
                let kick = self.gun.angular_sigma.max(1e-3);
                secondaries.push(Pending {
                    track: Track::secondary(*next_track_id, track.track_id, "gamma", "eBrem"),
                    position: end,
                    direction: direction_from_slopes(
                        direction.x / direction.z + kx * kick,
                        direction.y / direction.z + ky * kick,
                    ),
                    momentum: photon_p,
                });
                *next_track_id += 1;

                // finish the slab after the emission
                let mut exit = end + direction * ((edge - end.z) / direction.z);
                exit.z = edge;
                let pre = StepPoint::new(end, direction * momentum);
                let post = StepPoint::new(exit, direction * momentum).with_process("Transportation");
                if edge > end.z {
                    dispatch(&Step::new(&track, pre, post), volume)?;
                }
                position = exit;
            } else {
                let post = StepPoint::new(end, direction * momentum).with_process("Transportation");
                if volume != Volume::World {
                    dispatch(&Step::new(&track, pre, post), volume)?;
                }
                position = end;
            }
        }
        Ok(secondaries)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use rand::rngs::StdRng;

    fn calorimeter() -> Calorimeter {
        Calorimeter {
            n_layers: 2,
            absorber_thickness: 10.0,
            gap_thickness: 5.0,
        }
    }

    fn transport(brem_probability: Float) -> Transport {
        Transport {
            calorimeter: calorimeter(),
            gun: ParticleGun {
                particle: "e-".to_string(),
                energy: 1000.0,
                position_sigma: 1.0,
                angular_sigma: 0.01,
            },
            brem_probability,
            world_margin: 10.0,
        }
    }

    #[test]
    fn volumes_along_z() {
        let cal = calorimeter();
        assert_eq!(cal.thickness(), 30.0);
        assert_eq!(cal.volume_at(-20.0), Volume::World);
        assert_eq!(cal.volume_at(-15.0), Volume::Absorber);
        assert_eq!(cal.volume_at(-6.0), Volume::Absorber);
        assert_eq!(cal.volume_at(-3.0), Volume::Gap);
        assert_eq!(cal.volume_at(0.0), Volume::Absorber);
        assert_eq!(cal.volume_at(14.0), Volume::Gap);
        assert_eq!(cal.volume_at(15.0), Volume::World);
        assert_eq!(cal.boundaries(), vec![-15.0, -5.0, 0.0, 10.0, 15.0]);
    }

    #[test]
    fn gun_momentum_from_kinetic_energy() {
        let gun = ParticleGun {
            particle: "gamma".to_string(),
            energy: 50.0,
            position_sigma: 0.0,
            angular_sigma: 0.0,
        };
        assert_eq!(gun.momentum().unwrap(), 50.0);
        let bogus = ParticleGun {
            particle: "graviton".to_string(),
            ..gun
        };
        assert!(bogus.momentum().is_err());
    }

    #[test]
    fn without_brem_one_step_per_slab() {
        let t = transport(0.0);
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = Vec::new();
        t.transport_event(&mut rng, |step, volume| {
            seen.push((step.track.track_id, volume));
            assert!(step.delta_position().z > 0.0);
            Ok(())
        })
        .unwrap();
        assert_eq!(
            seen,
            vec![
                (1, Volume::Absorber),
                (1, Volume::Gap),
                (1, Volume::Absorber),
                (1, Volume::Gap)
            ]
        );
    }

    #[test]
    fn brem_photons_follow_their_parent() {
        let t = transport(1.0);
        let mut rng = StdRng::seed_from_u64(11);
        let mut tracks = Vec::new();
        t.transport_event(&mut rng, |step, _| {
            let trk = step.track;
            if trk.track_id > 1 {
                assert_eq!(trk.particle_name, "gamma");
                assert_eq!(trk.parent_id, 1);
                assert_eq!(
                    trk.creator_process.as_ref().map(|p| p.process_name()),
                    Some("eBrem")
                );
            }
            tracks.push(trk.track_id);
            Ok(())
        })
        .unwrap();
        // two absorber slabs, one photon each, tracked after the primary
        let first_photon = tracks.iter().position(|&id| id != 1).unwrap();
        assert!(tracks[..first_photon].iter().all(|&id| id == 1));
        assert!(tracks.contains(&2));
        assert!(tracks.contains(&3));
        assert_eq!(tracks.iter().filter(|&&id| id == 1).count(), 6);
    }

    #[test]
    fn brem_steps_always_move_forward() {
        let t = transport(1.0);
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            t.transport_event(&mut rng, |step, _| {
                assert!(step.delta_position().z > 0.0);
                Ok(())
            })
            .unwrap();
        }
    }

    #[test]
    fn same_seed_same_event() {
        let t = transport(0.5);
        let collect = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut out = Vec::new();
            t.transport_event(&mut rng, |step, _| {
                out.push(step.pre_step_point.position);
                Ok(())
            })
            .unwrap();
            out
        };
        assert_eq!(collect(3), collect(3));
    }
}
