/*!
 Errors that can happen when reading Palm archive data.
*/

pub mod archive;
pub mod record;
pub mod stream;
