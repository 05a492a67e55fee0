use crate::ThisOrThat;

pub(crate) mod dms {
    /// Degrees per quarter turn
    pub const QD: i32 = 90;
    /// Degrees per half turn
    pub const HD: i32 = 2 * QD;
    /// Degrees per turn
    pub const TD: i32 = 2 * HD;
}

pub(crate) trait GeoMath {
    fn is_zero(&self) -> bool;
    fn eps_eq(&self, other: Self) -> bool;
    fn ang_normalize(&self) -> Self;
    fn eatanhe(&self, es: Self) -> Self;
    fn remainder(&self, denom: Self) -> Self;
    fn taupf(&self, es: Self) -> Self;
    fn tauf(&self, es: Self) -> Self;
}

impl GeoMath for f64 {
    fn is_zero(&self) -> bool {
        self.abs() < f64::EPSILON
    }

    fn eps_eq(&self, other: f64) -> bool {
        (*self - other).abs() < f64::EPSILON
    }

    /// Reduce an angle in degrees to `[-180, 180)`.
    fn ang_normalize(&self) -> f64 {
        let value = self.remainder(f64::from(dms::TD));
        let hd = f64::from(dms::HD);

        if value.eps_eq(hd) || value >= hd {
            -hd
        } else {
            value
        }
    }

    fn eatanhe(&self, es: f64) -> f64 {
        es.is_sign_positive().ternary_lazy(
            || es * (es * *self).atanh(),
            || -es * (es * *self).atan(),
        )
    }

    fn remainder(&self, denom: Self) -> Self {
        *self - (*self / denom).round() * denom
    }

    fn taupf(&self, es: f64) -> f64 {
        let tau1 = 1.0_f64.hypot(*self);
        let sig = (*self / tau1).eatanhe(es).sinh();

        1.0_f64.hypot(sig) * *self - sig * tau1
    }

    #[allow(clippy::similar_names)]
    fn tauf(&self, es: f64) -> f64 {
        let numit = 5;
        let tol = f64::EPSILON.sqrt() / 10.0;

        let e2m = 1.0 - es.powi(2);
        let mut tau = if self.abs() > 70.0 {
            self * 1_f64.eatanhe(es).exp()
        } else {
            self / e2m
        };

        let stol = tol * self.abs().max(1.0);
        for _ in 0..numit {
            let taupa = tau.taupf(es);
            let dtau = (self - taupa) * (1.0 + e2m * tau.powi(2))
                / (e2m * 1.0_f64.hypot(tau) * 1.0_f64.hypot(taupa));
            tau += dtau;
            if dtau.abs() < stol {
                break;
            }
        }
        tau
    }
}
