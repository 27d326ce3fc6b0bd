//! Report output port trait.

use crate::domain::analysis::AnalysisReport;
use crate::domain::error::ParityError;

/// Port for presenting a finished analysis.
pub trait ReportPort {
    fn write(&self, report: &AnalysisReport) -> Result<(), ParityError>;
}
