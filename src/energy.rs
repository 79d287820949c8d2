/// Mean of squared normalized amplitudes over one frame's interleaved samples.
///
/// Each sample is normalized to [-1.0, 1.0] by dividing by 32768.0, so a
/// full-scale frame measures close to 1.0 and digital silence measures 0.0.
/// A zero-length frame measures 0.0 rather than dividing by zero.
pub fn frame_energy(samples: &[i16]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum: f64 = samples
        .iter()
        .map(|&sample| {
            let normalized = sample as f64 / 32768.0;
            normalized * normalized
        })
        .sum();

    sum / samples.len() as f64
}
