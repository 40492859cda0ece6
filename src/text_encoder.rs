use std::io::Write;

use crate::Result;
use crate::decision::DetectionResult;

/// Writes one `[index] probability, flag` line per hop.
///
/// The probability is printed with six decimals and the flag as `0` or `1`:
/// ```text
/// [0] 0.012345, 0
/// [1] 0.871002, 1
/// ```
pub struct TextEncoder<W: Write> {
    w: W,
    closed: bool,
}

impl<W: Write> TextEncoder<W> {
    pub fn new(w: W) -> Self {
        Self { w, closed: false }
    }

    pub fn write_result(&mut self, result: &DetectionResult) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write result: encoder is already closed",
            ));
        }

        writeln!(&mut self.w, "{}", format_line(result))?;
        Ok(())
    }

    /// Flush the underlying writer. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.w.flush()?;
        self.closed = true;
        Ok(())
    }
}

/// Render one result as `[index] probability, flag`.
pub fn format_line(result: &DetectionResult) -> String {
    format!(
        "[{}] {:.6}, {}",
        result.index,
        result.probability,
        result.flag()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(index: usize, probability: f32, is_voice: bool) -> DetectionResult {
        DetectionResult {
            index,
            probability,
            is_voice,
        }
    }

    #[test]
    fn text_line_format() {
        assert_eq!(format_line(&result(0, 0.0, false)), "[0] 0.000000, 0");
        assert_eq!(format_line(&result(61, 1.0, true)), "[61] 1.000000, 1");
        assert_eq!(format_line(&result(7, 0.25, true)), "[7] 0.250000, 1");
    }

    #[test]
    fn text_writes_one_line_per_result() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = TextEncoder::new(&mut out);
        enc.write_result(&result(0, 0.125, false))?;
        enc.write_result(&result(1, 0.875, true))?;
        enc.close()?;

        assert_eq!(
            std::str::from_utf8(&out)?,
            "[0] 0.125000, 0\n[1] 0.875000, 1\n"
        );
        Ok(())
    }

    #[test]
    fn text_close_without_results_emits_nothing() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = TextEncoder::new(&mut out);
        enc.close()?;
        enc.close()?;
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn text_write_after_close_errors() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = TextEncoder::new(&mut out);
        enc.close()?;
        let err = enc.write_result(&result(0, 0.1, false)).unwrap_err();
        assert!(err.to_string().contains("already closed"));
        Ok(())
    }
}
