//! Channel conversion and sample-rate conversion for interleaved audio.

use rubato::{FftFixedIn, Resampler};
use tracing::debug;

use super::AudioError;

/// Input block handed to the FFT resampler per call
const RESAMPLE_CHUNK_FRAMES: usize = 1024;

/// Below this many frames the FFT filter has nothing to settle on
const MIN_FFT_FRAMES: usize = 64;

/// Remix interleaved samples from `from` channels to `to` channels.
///
/// Downmixing to mono averages every frame; upmixing from mono duplicates the
/// single channel; any other combination maps output channel `c` to input
/// channel `c % from`.
pub fn convert_channels(samples: &[f32], from: u16, to: u16) -> Vec<f32> {
    let from = from.max(1) as usize;
    let to = to.max(1) as usize;
    if from == to {
        return samples.to_vec();
    }

    let frames = samples.len() / from;
    let mut out = Vec::with_capacity(frames * to);
    for frame in samples.chunks_exact(from) {
        if to == 1 {
            out.push(frame.iter().sum::<f32>() / from as f32);
        } else {
            out.extend((0..to).map(|c| frame[c % from]));
        }
    }
    out
}

/// Resample interleaved audio to `to_rate`.
///
/// Each channel goes through a band-limited FFT resampler, so content above
/// the new Nyquist frequency is filtered out rather than aliased. The filter
/// delay is trimmed and the output holds exactly `frames * to_rate / from_rate`
/// frames (rounded down). Inputs shorter than 64 frames fall back to linear
/// interpolation.
pub fn resample(
    samples: &[f32],
    channels: u16,
    from_rate: u32,
    to_rate: u32,
) -> Result<Vec<f32>, AudioError> {
    let channels = channels.max(1) as usize;
    if from_rate == to_rate || from_rate == 0 || to_rate == 0 {
        return Ok(samples.to_vec());
    }

    let in_frames = samples.len() / channels;
    if in_frames == 0 {
        return Ok(Vec::new());
    }
    if in_frames < MIN_FFT_FRAMES {
        return Ok(resample_linear(samples, channels as u16, from_rate, to_rate));
    }

    let out_frames = (in_frames as u64 * to_rate as u64 / from_rate as u64) as usize;

    let planar: Vec<Vec<f32>> = (0..channels)
        .map(|c| {
            samples
                .iter()
                .skip(c)
                .step_by(channels)
                .take(in_frames)
                .copied()
                .collect()
        })
        .collect();

    let mut resampler = FftFixedIn::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        in_frames.min(RESAMPLE_CHUNK_FRAMES),
        2,
        channels,
    )
    .map_err(|e| AudioError::Resample(e.to_string()))?;

    let delay = resampler.output_delay();
    let wanted = out_frames + delay;
    let mut output: Vec<Vec<f32>> = vec![Vec::with_capacity(wanted); channels];
    let mut pos = 0;

    // The tail is zero-padded until the delayed output has fully drained
    while output[0].len() < wanted {
        let needed = resampler.input_frames_next();
        let end = (pos + needed).min(in_frames);
        let block: Vec<Vec<f32>> = planar
            .iter()
            .map(|channel| {
                let mut chunk = channel[pos..end].to_vec();
                chunk.resize(needed, 0.0);
                chunk
            })
            .collect();
        pos = end;

        let processed = resampler
            .process(&block, None)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
        for (dst, src) in output.iter_mut().zip(processed) {
            dst.extend(src);
        }
    }

    debug!(
        from_rate,
        to_rate,
        channels,
        in_frames,
        out_frames,
        delay,
        "Resampled audio"
    );

    let mut out = Vec::with_capacity(out_frames * channels);
    for i in delay..wanted {
        out.extend(output.iter().map(|channel| channel[i]));
    }
    Ok(out)
}

/// Resample interleaved audio with linear interpolation.
///
/// Used for inputs too short for the FFT resampler. The output holds
/// `frames * to_rate / from_rate` frames (rounded down).
pub fn resample_linear(samples: &[f32], channels: u16, from_rate: u32, to_rate: u32) -> Vec<f32> {
    let channels = channels.max(1) as usize;
    if from_rate == to_rate || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }

    let in_frames = samples.len() / channels;
    if in_frames == 0 {
        return Vec::new();
    }

    let out_frames = (in_frames as u64 * to_rate as u64 / from_rate as u64) as usize;
    let ratio = from_rate as f64 / to_rate as f64;
    let mut out = Vec::with_capacity(out_frames * channels);

    for i in 0..out_frames {
        let src = i as f64 * ratio;
        let idx0 = (src.floor() as usize).min(in_frames - 1);
        let idx1 = (idx0 + 1).min(in_frames - 1);
        let frac = (src - idx0 as f64) as f32;

        for c in 0..channels {
            let a = samples[idx0 * channels + c];
            let b = samples[idx1 * channels + c];
            out.push(a + (b - a) * frac);
        }
    }

    out
}
