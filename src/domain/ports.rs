use crate::domain::model::ClassifiedResult;
use crate::utils::error::Result;

/// Consumer of classified results (persistence, HTTP layer, report writer).
pub trait ResultSink {
    fn accept(&mut self, result: &ClassifiedResult) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
