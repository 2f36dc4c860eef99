use pc80b_rs::Pc80bError;

pub const SUCCESS: i32 = 0;
pub const INPUT_ERROR: i32 = 1;
pub const EXECUTION_ERROR: i32 = 2;
pub const PARTIAL_FAILURE: i32 = 3;

/// Bad files and bad parameters are input errors; everything else failed
/// while running.
pub fn for_error(err: &Pc80bError) -> i32 {
    match err {
        Pc80bError::FileNotFound(_)
        | Pc80bError::Configuration(_)
        | Pc80bError::InsufficientData(_) => INPUT_ERROR,
        _ => EXECUTION_ERROR,
    }
}
