//! CIEDE2000 color difference with a lightness bias.
//!
//! The formula is evaluated directly on Oklab coordinates (L in 0..=1,
//! kL = kC = kH = 1). The weighting functions keep their CIELAB constants, so
//! absolute values are not comparable with CIELAB ΔE00; only the ordering of
//! candidates matters for palette matching.

use super::oklab::Oklab;

const POW25_7: f64 = 6_103_515_625.0; // 25^7

/// Perceptual difference between `pixel` and `candidate`, reduced by
/// `bias * ΔL` where `ΔL = candidate.l - pixel.l`.
///
/// A positive bias lowers the distance of candidates lighter than the pixel,
/// a negative bias lowers the distance of darker ones. The result may be
/// negative once the bias term dominates.
///
/// ```
/// use palette_match::{delta_e_2000, Oklab};
///
/// let gray = Oklab::new(0.6, 0.0, 0.0);
/// let black = Oklab::new(0.0, 0.0, 0.0);
/// let white = Oklab::new(1.0, 0.0, 0.0);
/// assert!(delta_e_2000(gray, white, 0.0) < delta_e_2000(gray, black, 0.0));
/// ```
pub fn delta_e_2000(pixel: Oklab, candidate: Oklab, bias: f64) -> f64 {
    let (l1, a1, b1) = (pixel.l, pixel.a, pixel.b);
    let (l2, a2, b2) = (candidate.l, candidate.a, candidate.b);

    // Step 1: chroma and the a' correction factor
    let c1 = (a1 * a1 + b1 * b1).sqrt();
    let c2 = (a2 * a2 + b2 * b2).sqrt();
    let avg_c7 = ((c1 + c2) / 2.0).powi(7);
    let g = 0.5 * (1.0 - (avg_c7 / (avg_c7 + POW25_7)).sqrt());

    // Step 2: a', C', h'
    let a1p = a1 * (1.0 + g);
    let a2p = a2 * (1.0 + g);
    let c1p = (a1p * a1p + b1 * b1).sqrt();
    let c2p = (a2p * a2p + b2 * b2).sqrt();
    let h1p = hue_degrees(b1, a1p);
    let h2p = hue_degrees(b2, a2p);

    // Step 3: ΔL', ΔC', ΔH'
    let dl = l2 - l1;
    let dc = c2p - c1p;
    let chroma_product = c1p * c2p;
    let mut dh = 0.0;
    if chroma_product != 0.0 {
        dh = h2p - h1p;
        if dh > 180.0 {
            dh -= 360.0;
        } else if dh < -180.0 {
            dh += 360.0;
        }
    }
    let big_dh = 2.0 * chroma_product.sqrt() * (dh.to_radians() / 2.0).sin();

    // Step 4: weighting functions
    let avg_l = (l1 + l2) / 2.0;
    let avg_cp = (c1p + c2p) / 2.0;
    let avg_hp = if chroma_product == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (avg_hp - 30.0).to_radians().cos()
        + 0.24 * (2.0 * avg_hp).to_radians().cos()
        + 0.32 * (3.0 * avg_hp + 6.0).to_radians().cos()
        - 0.20 * (4.0 * avg_hp - 63.0).to_radians().cos();

    let l50 = (avg_l - 50.0) * (avg_l - 50.0);
    let sl = 1.0 + 0.015 * l50 / (20.0 + l50).sqrt();
    let sc = 1.0 + 0.045 * avg_cp;
    let sh = 1.0 + 0.015 * avg_cp * t;

    // Step 5: rotation term
    let theta = 30.0 * (-((avg_hp - 275.0) / 25.0).powi(2)).exp();
    let avg_cp7 = avg_cp.powi(7);
    let rc = 2.0 * (avg_cp7 / (avg_cp7 + POW25_7)).sqrt();
    let rt = -rc * (2.0 * theta).to_radians().sin();

    let tl = dl / sl;
    let tc = dc / sc;
    let th = big_dh / sh;
    let sum = tl * tl + tc * tc + th * th + rt * tc * th;

    sum.max(0.0).sqrt() - dl * bias
}

/// Hue angle in degrees; 0 for achromatic colors.
#[inline]
fn hue_degrees(b: f64, a: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        0.0
    } else {
        b.atan2(a).to_degrees().rem_euclid(360.0)
    }
}
