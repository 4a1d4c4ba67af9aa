//! Color choices shared by the two renderers: the marker temperature bands
//! of the interactive map and the diverging colormap of the isotherm plot.

/// Marker color band for the interactive map.
pub(crate) fn marker_color(temperature_c: f64) -> &'static str {
    if temperature_c < 10.0 {
        "blue"
    } else if temperature_c < 20.0 {
        "green"
    } else if temperature_c < 30.0 {
        "orange"
    } else {
        "red"
    }
}

// Key colors of a blue-yellow-red diverging map (cold to hot).
const STOPS: [(u8, u8, u8); 5] = [
    (49, 54, 149),
    (116, 173, 209),
    (254, 224, 144),
    (244, 109, 67),
    (165, 0, 38),
];

/// Maps `t` in `[0, 1]` onto the diverging colormap, piecewise-linearly
/// between the key colors. Out-of-range inputs are clamped.
pub(crate) fn diverging_rgb(t: f64) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (STOPS.len() - 1) as f64;
    let index = (scaled.floor() as usize).min(STOPS.len() - 2);
    let frac = scaled - index as f64;

    let (r0, g0, b0) = STOPS[index];
    let (r1, g1, b1) = STOPS[index + 1];
    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac) as u8;
    (lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}
