/*!
 Contains logic to read the preamble shared by every Palm archive: its type signature, names, category table, and schema block.
*/

pub mod header;
pub mod models;
