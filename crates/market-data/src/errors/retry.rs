/// Classification for retry policy.
///
/// Tells the caller of a public operation whether repeating the same call
/// can succeed. The client itself never retries.
///
/// # Behavior Summary
///
/// | Class | Retry same input? | Reference cache touched? |
/// |-------|-------------------|--------------------------|
/// | `Retryable` | Yes | No (stale entry preserved) |
/// | `Never` | No | No |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Transient failure - the provider was unreachable, slow, refused the
    /// request, or sent nothing back.
    ///
    /// Any previously cached reference data is still readable and the same
    /// call may succeed later.
    Retryable,

    /// Permanent failure for this input - an unknown code, a payload that no
    /// longer matches the expected shape, or a local configuration problem.
    /// Repeating the call unchanged will fail the same way.
    Never,
}
