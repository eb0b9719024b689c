// In-place gain for 16-bit PCM WAV data

use std::path::Path;

/// Scale every sample of the `data` chunk by `gain`. Returns false when the
/// buffer is not a RIFF/WAVE file or has no data chunk.
pub(crate) fn scale_pcm16(buf: &mut [u8], gain: f32) -> bool {
    if buf.len() < 12 || &buf[0..4] != b"RIFF" || &buf[8..12] != b"WAVE" {
        return false;
    }
    let mut idx = 12;
    while idx + 8 <= buf.len() {
        let size =
            u32::from_le_bytes([buf[idx + 4], buf[idx + 5], buf[idx + 6], buf[idx + 7]]) as usize;
        if &buf[idx..idx + 4] == b"data" {
            let start = idx + 8;
            // streamed WAVs may declare more data than was written
            let end = start.saturating_add(size).min(buf.len());
            for sample in buf[start..end].chunks_exact_mut(2) {
                let s = i16::from_le_bytes([sample[0], sample[1]]);
                let scaled = (s as f32 * gain).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
                sample.copy_from_slice(&scaled.to_le_bytes());
            }
            return true;
        }
        // chunks are word aligned
        idx = idx.saturating_add(8).saturating_add(size + (size & 1));
    }
    false
}

pub(crate) async fn scale_wav_file(path: &Path, gain: f32) -> std::io::Result<()> {
    let mut buf = tokio::fs::read(path).await?;
    if scale_pcm16(&mut buf, gain) {
        tokio::fs::write(path, &buf).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav(samples: &[i16]) -> Vec<u8> {
        let data: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let mut buf = Vec::new();
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&[0u8; 16]);
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
        buf.extend_from_slice(&data);
        buf
    }

    fn samples(buf: &[u8]) -> Vec<i16> {
        buf[44..]
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]))
            .collect()
    }

    #[test]
    fn test_scale_halves_and_clips() {
        let mut buf = wav(&[1000, -1000, 20000]);
        assert!(scale_pcm16(&mut buf, 0.5));
        assert_eq!(samples(&buf), vec![500, -500, 10000]);

        let mut buf = wav(&[30000, -30000]);
        assert!(scale_pcm16(&mut buf, 2.0));
        assert_eq!(samples(&buf), vec![i16::MAX, i16::MIN]);
    }

    #[test]
    fn test_rejects_non_wav_and_truncated() {
        let mut junk = b"not a wav file at all".to_vec();
        assert!(!scale_pcm16(&mut junk, 0.5));
        let mut short = b"RIFF".to_vec();
        assert!(!scale_pcm16(&mut short, 0.5));

        // declared data length past the end of the buffer
        let mut buf = wav(&[1000, 1000]);
        let len = buf.len();
        buf[40..44].copy_from_slice(&1000u32.to_le_bytes());
        assert!(scale_pcm16(&mut buf, 0.5));
        assert_eq!(buf.len(), len);
        assert_eq!(samples(&buf), vec![500, 500]);
    }
}
