/*!
 Contains logic to decode Datebook archives into [`Appointment`](models::Appointment)s.

 ## Overview

 After the [archive header](crate::archive::header), a Datebook archive holds a count of fields
 followed by a flat sequence of records. Each record is exactly fifteen fields, and every field is
 preceded by a type tag that must match the type the format requires at that position. The final
 field is a variable-length repeat block that may carry a [`RepeatRule`](repeat::RepeatRule), which
 is expanded into concrete occurrence dates by the [`recurrence`] module.

 There is no per-record length prefix, so a malformed record cannot be skipped: decoding resumes
 wherever the failure left the stream.
*/

pub mod models;
pub mod options;
pub mod reader;
pub mod record;
pub mod recurrence;
pub mod repeat;
mod tests;
