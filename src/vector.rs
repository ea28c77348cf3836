use crate::Float;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A point or displacement in 3D space. Components are in internal
/// units (mm for lengths, MeV for momenta).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ThreeVector {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl ThreeVector {
    pub const fn new(x: Float, y: Float, z: Float) -> ThreeVector {
        ThreeVector { x, y, z }
    }

    pub fn x(&self) -> Float {
        self.x
    }

    pub fn y(&self) -> Float {
        self.y
    }

    pub fn z(&self) -> Float {
        self.z
    }

    pub fn mag2(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn mag(&self) -> Float {
        self.mag2().sqrt()
    }

    /// Unit vector along self. The zero vector stays zero.
    pub fn unit(&self) -> ThreeVector {
        let m = self.mag();
        if m > 0.0 {
            *self / m
        } else {
            *self
        }
    }
}

impl Add for ThreeVector {
    type Output = ThreeVector;
    fn add(self, other: ThreeVector) -> ThreeVector {
        ThreeVector::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for ThreeVector {
    type Output = ThreeVector;
    fn sub(self, other: ThreeVector) -> ThreeVector {
        ThreeVector::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<Float> for ThreeVector {
    type Output = ThreeVector;
    fn mul(self, s: Float) -> ThreeVector {
        ThreeVector::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Div<Float> for ThreeVector {
    type Output = ThreeVector;
    fn div(self, s: Float) -> ThreeVector {
        ThreeVector::new(self.x / s, self.y / s, self.z / s)
    }
}

impl Neg for ThreeVector {
    type Output = ThreeVector;
    fn neg(self) -> ThreeVector {
        ThreeVector::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for ThreeVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}
