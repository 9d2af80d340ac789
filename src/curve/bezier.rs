//! Arbitrary-degree Bezier evaluation and anti-aliased plotting
//!
//! A curve with `n + 1` control points is the Bernstein sum
//! `sum C(n, i) (1 - t)^(n - i) t^i P_i`. Binomial coefficients come from an
//! integer Pascal row, which bounds the supported control point count.

use thiserror::Error;

use super::canvas::{Canvas, Channel};
use crate::rasterizer::{Color, Vec2};

/// Largest control point count whose Pascal row fits in `u64` (C(67, 33) < 2^64)
pub const MAX_CONTROL_POINTS: usize = 68;

/// Number of parameter steps across [0, 1] when plotting
pub const SAMPLE_STEPS: u32 = 10_000;

/// Steps used by the closed-form cubic plot
pub const NAIVE_SAMPLE_STEPS: u32 = 1_000;

/// Channel the generalized curve is drawn on
pub const CURVE_CHANNEL: Channel = Channel::Green;

/// Channel the closed-form cubic is drawn on
pub const NAIVE_CHANNEL: Channel = Channel::Red;

/// Radius of the markers drawn at each control point
pub const CONTROL_POINT_RADIUS: i32 = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    #[error("a curve needs at least one control point")]
    NoControlPoints,

    #[error("{count} control points exceeds the supported maximum of {max}")]
    TooManyControlPoints { count: usize, max: usize },

    #[error("{needed} control points needed, got {got}")]
    TooFewControlPoints { needed: usize, got: usize },
}

/// Row `n` of Pascal's triangle, built additively with overflow checks
pub fn binomial_row(n: usize) -> Result<Vec<u64>, CurveError> {
    let too_many = CurveError::TooManyControlPoints { count: n + 1, max: MAX_CONTROL_POINTS };
    if n + 1 > MAX_CONTROL_POINTS {
        return Err(too_many);
    }

    let mut row = Vec::with_capacity(n + 1);
    row.push(1u64);
    for i in 1..=n {
        for k in (1..i).rev() {
            row[k] = row[k].checked_add(row[k - 1]).ok_or_else(|| too_many.clone())?;
        }
        row.push(1);
    }
    Ok(row)
}

/// A Bezier curve with precomputed binomial coefficients
#[derive(Debug, Clone)]
pub struct Bezier<'a> {
    points: &'a [Vec2],
    coefficients: Vec<u64>,
}

impl<'a> Bezier<'a> {
    pub fn new(points: &'a [Vec2]) -> Result<Self, CurveError> {
        if points.is_empty() {
            return Err(CurveError::NoControlPoints);
        }
        let coefficients = binomial_row(points.len() - 1)?;
        Ok(Self { points, coefficients })
    }

    pub fn degree(&self) -> usize {
        self.points.len() - 1
    }

    /// Point at parameter `t`. t = 0 and t = 1 return the end points exactly.
    pub fn point_at(&self, t: f32) -> Vec2 {
        let n = self.degree();
        let t = t as f64;
        let s = 1.0 - t;

        let (mut x, mut y) = (0.0f64, 0.0f64);
        for (i, (p, &c)) in self.points.iter().zip(&self.coefficients).enumerate() {
            let w = c as f64 * s.powi((n - i) as i32) * t.powi(i as i32);
            x += w * p.x as f64;
            y += w * p.y as f64;
        }
        Vec2::new(x as f32, y as f32)
    }

    /// Evenly spaced samples over [0, 1], both ends included
    pub fn samples(&self, steps: u32) -> impl Iterator<Item = Vec2> + '_ {
        (0..=steps).map(move |i| self.point_at(i as f32 / steps as f32))
    }
}

/// Plot one curve sample: the containing pixel at full intensity, then the
/// three neighbors on the side the sample leans towards, weighted by
/// relative distance. Approximate splatting, not a coverage integral.
/// Channels only ever brighten.
pub fn plot_sample(canvas: &mut Canvas, p: Vec2, channel: Channel) {
    if !p.x.is_finite() || !p.y.is_finite() {
        return;
    }

    let (fx, fy) = (p.x.floor(), p.y.floor());
    canvas.raise_channel(fx as i64, fy as i64, channel, 255);

    let x_flag = if p.x - fx < 0.5 { -1.0 } else { 1.0 };
    let y_flag = if p.y - fy < 0.5 { -1.0 } else { 1.0 };

    let p00 = Vec2::new(fx + 0.5, fy + 0.5);
    let neighbors = [
        Vec2::new(fx + x_flag + 0.5, fy + 0.5),
        Vec2::new(fx + 0.5, fy + y_flag + 0.5),
        Vec2::new(fx + x_flag + 0.5, fy + y_flag + 0.5),
    ];

    let len = p.distance(p00);
    for n in neighbors {
        let l = p.distance(n);
        let intensity = (255.0 * len / l).min(255.0) as u8;
        canvas.raise_channel(n.x.floor() as i64, n.y.floor() as i64, channel, intensity);
    }
}

/// Sample the curve densely and plot it with anti-aliasing on the green channel
pub fn render_curve(points: &[Vec2], canvas: &mut Canvas) -> Result<(), CurveError> {
    let curve = Bezier::new(points)?;
    for p in curve.samples(SAMPLE_STEPS) {
        plot_sample(canvas, p, CURVE_CHANNEL);
    }
    Ok(())
}

/// Closed-form cubic through the first four control points
pub fn cubic_point(p: &[Vec2; 4], t: f32) -> Vec2 {
    let s = 1.0 - t;
    p[0] * (s * s * s) + p[1] * (3.0 * t * s * s) + p[2] * (3.0 * t * t * s) + p[3] * (t * t * t)
}

/// Plot the closed-form cubic on the red channel, without anti-aliasing
pub fn naive_bezier(points: &[Vec2], canvas: &mut Canvas) -> Result<(), CurveError> {
    let cubic: &[Vec2; 4] = points
        .get(..4)
        .and_then(|p| p.try_into().ok())
        .ok_or(CurveError::TooFewControlPoints { needed: 4, got: points.len() })?;

    for i in 0..=NAIVE_SAMPLE_STEPS {
        let p = cubic_point(cubic, i as f32 / NAIVE_SAMPLE_STEPS as f32);
        if p.x.is_finite() && p.y.is_finite() {
            canvas.raise_channel(p.x.floor() as i64, p.y.floor() as i64, NAIVE_CHANNEL, 255);
        }
    }
    Ok(())
}

/// Mark each control point with a filled white circle
pub fn draw_control_points(points: &[Vec2], canvas: &mut Canvas) {
    for p in points {
        canvas.draw_circle(p.x.round() as i32, p.y.round() as i32, CONTROL_POINT_RADIUS, Color::WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(points: &[Vec2], t: f32) -> Result<Vec2, CurveError> {
        Ok(Bezier::new(points)?.point_at(t))
    }

    fn quad() -> Vec<Vec2> {
        vec![
            Vec2::new(100.0, 500.0),
            Vec2::new(200.0, 100.0),
            Vec2::new(450.0, 600.0),
            Vec2::new(600.0, 200.0),
        ]
    }

    #[test]
    fn test_binomial_rows() {
        assert_eq!(binomial_row(0).unwrap(), vec![1]);
        assert_eq!(binomial_row(3).unwrap(), vec![1, 3, 3, 1]);
        assert_eq!(binomial_row(5).unwrap(), vec![1, 5, 10, 10, 5, 1]);
        assert_eq!(binomial_row(67).unwrap()[33], 14_226_520_737_620_288_370);
    }

    #[test]
    fn test_control_point_limit() {
        let pts = vec![Vec2::new(1.0, 1.0); MAX_CONTROL_POINTS];
        assert!(evaluate(&pts, 0.5).is_ok());

        let pts = vec![Vec2::new(1.0, 1.0); MAX_CONTROL_POINTS + 1];
        assert_eq!(
            evaluate(&pts, 0.5),
            Err(CurveError::TooManyControlPoints { count: 69, max: MAX_CONTROL_POINTS })
        );
    }

    #[test]
    fn test_no_control_points() {
        assert_eq!(evaluate(&[], 0.5), Err(CurveError::NoControlPoints));
        let mut canvas = Canvas::new(4, 4);
        assert!(render_curve(&[], &mut canvas).is_err());
    }

    #[test]
    fn test_endpoints_exact() {
        for count in 1..=12 {
            let pts: Vec<Vec2> = (0..count)
                .map(|i| Vec2::new(i as f32 * 13.7 + 0.3, (i * i) as f32 * 0.9 - 4.1))
                .collect();
            assert_eq!(evaluate(&pts, 0.0).unwrap(), pts[0], "count {}", count);
            assert_eq!(evaluate(&pts, 1.0).unwrap(), pts[count - 1], "count {}", count);
        }
    }

    #[test]
    fn test_single_point_is_constant() {
        let p = [Vec2::new(3.5, -2.0)];
        for t in [0.0, 0.25, 0.5, 1.0] {
            assert_eq!(evaluate(&p, t).unwrap(), p[0]);
        }
    }

    #[test]
    fn test_four_points_match_cubic_formula() {
        let pts = quad();
        let cubic: [Vec2; 4] = [pts[0], pts[1], pts[2], pts[3]];
        for i in 0..=100 {
            let t = i as f32 / 100.0;
            let a = evaluate(&pts, t).unwrap();
            let b = cubic_point(&cubic, t);
            assert!(a.distance(b) < 1e-3, "t = {}: {:?} vs {:?}", t, a, b);
        }
    }

    #[test]
    fn test_two_points_is_linear() {
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 20.0)];
        let mid = evaluate(&pts, 0.5).unwrap();
        assert!(mid.distance(Vec2::new(5.0, 10.0)) < 1e-5);
    }

    #[test]
    fn test_render_is_deterministic() {
        let pts = quad();
        let mut a = Canvas::new(700, 700);
        let mut b = Canvas::new(700, 700);
        render_curve(&pts, &mut a).unwrap();
        render_curve(&pts, &mut b).unwrap();
        assert_eq!(a.pixels, b.pixels);
        assert_eq!(a.channel(100, 500, CURVE_CHANNEL), Some(255));
        assert_eq!(a.channel(600, 200, CURVE_CHANNEL), Some(255));
        assert_eq!(a.channel(100, 500, Channel::Red), Some(0));
    }

    #[test]
    fn test_antialias_is_monotonic() {
        let pts = [
            Vec2::new(2.0, 2.0),
            Vec2::new(5.0, 28.0),
            Vec2::new(20.0, -4.0),
            Vec2::new(29.0, 18.0),
        ];
        let curve = Bezier::new(&pts).unwrap();
        let mut canvas = Canvas::new(32, 32);

        for p in curve.samples(400) {
            let before = canvas.pixels.clone();
            plot_sample(&mut canvas, p, CURVE_CHANNEL);
            for (old, new) in before.iter().zip(&canvas.pixels) {
                assert!(new >= old);
            }
        }
    }

    /// Plot `p` on a fresh canvas and check the lit pixels: (3, 3) at full
    /// intensity, `lit` weighted by distance, `dark` untouched
    fn check_splat(p: Vec2, lit: [(i64, i64); 3], dark: &[(i64, i64)]) {
        let mut canvas = Canvas::new(8, 8);
        plot_sample(&mut canvas, p, CURVE_CHANNEL);

        assert_eq!(canvas.channel(3, 3, CURVE_CHANNEL), Some(255));
        let len = p.distance(Vec2::new(3.5, 3.5));
        for (x, y) in lit {
            let l = p.distance(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
            let expected = (255.0 * len / l) as u8;
            assert!(expected > 0);
            assert_eq!(canvas.channel(x, y, CURVE_CHANNEL), Some(expected), "({}, {})", x, y);
        }
        for &(x, y) in dark {
            assert_eq!(canvas.channel(x, y, CURVE_CHANNEL), Some(0), "({}, {})", x, y);
        }
    }

    #[test]
    fn test_antialias_neighbors_right_down() {
        check_splat(Vec2::new(3.8, 3.7), [(4, 3), (3, 4), (4, 4)], &[(2, 2), (2, 3), (3, 2)]);
    }

    #[test]
    fn test_antialias_neighbors_left_up() {
        check_splat(Vec2::new(3.2, 3.3), [(2, 3), (3, 2), (2, 2)], &[(4, 4), (4, 3), (3, 4)]);
    }

    #[test]
    fn test_antialias_neighbors_mixed_sides() {
        check_splat(Vec2::new(3.8, 3.2), [(4, 3), (3, 2), (4, 2)], &[(2, 3), (3, 4), (2, 4), (4, 4)]);
        check_splat(Vec2::new(3.2, 3.8), [(2, 3), (3, 4), (2, 4)], &[(4, 3), (3, 2), (4, 2), (4, 4)]);
    }

    #[test]
    fn test_samples_near_border_are_clipped() {
        let mut canvas = Canvas::new(4, 4);
        plot_sample(&mut canvas, Vec2::new(0.1, 0.1), CURVE_CHANNEL);
        plot_sample(&mut canvas, Vec2::new(3.9, 3.9), CURVE_CHANNEL);
        plot_sample(&mut canvas, Vec2::new(-50.0, 2.0), CURVE_CHANNEL);
        plot_sample(&mut canvas, Vec2::new(f32::NAN, 2.0), CURVE_CHANNEL);
        assert_eq!(canvas.channel(0, 0, CURVE_CHANNEL), Some(255));
        assert_eq!(canvas.channel(3, 3, CURVE_CHANNEL), Some(255));
    }

    #[test]
    fn test_naive_bezier_needs_four_points() {
        let mut canvas = Canvas::new(700, 700);
        assert_eq!(
            naive_bezier(&quad()[..3], &mut canvas),
            Err(CurveError::TooFewControlPoints { needed: 4, got: 3 })
        );
        naive_bezier(&quad(), &mut canvas).unwrap();
        assert_eq!(canvas.channel(100, 500, NAIVE_CHANNEL), Some(255));
        assert_eq!(canvas.channel(100, 500, CURVE_CHANNEL), Some(0));
    }

    #[test]
    fn test_control_point_markers() {
        let mut canvas = Canvas::new(16, 16);
        draw_control_points(&[Vec2::new(8.0, 8.0)], &mut canvas);
        assert_eq!(canvas.pixel(8, 8), Some(Color::WHITE));
        assert_eq!(canvas.pixel(8, 11), Some(Color::WHITE));
        assert_eq!(canvas.pixel(8, 12), Some(Color::BLACK));
    }
}
