pub mod classify;
pub mod fields;
pub mod workouts;

use crate::error::{Field, SkipReason};
use crate::store::ProgramRecord;

/// Turn one record span into a program, or say which field was missing.
/// Fields are checked in a fixed order and the first gap is reported.
pub fn extract(id: &str, span: &str) -> Result<ProgramRecord, SkipReason> {
    let missing = SkipReason::MissingField;

    let name = fields::name(span).ok_or(missing(Field::Name))?;
    let days = fields::days(span).ok_or(missing(Field::Days))?;
    let description = fields::description(span).ok_or(missing(Field::Description))?;
    let focus = fields::focus(span).ok_or(missing(Field::Focus))?;
    let workouts = workouts::extract(span).ok_or(missing(Field::Workouts))?;

    Ok(ProgramRecord {
        name,
        level: classify::level(id),
        days,
        goal: classify::goal(id),
        description,
        focus,
        workouts,
    })
}
