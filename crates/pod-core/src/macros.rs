//! Entry-set literal macro.

/// Build [`PodEntries`](crate::PodEntries) from `name => value` pairs.
///
/// Values go through `PodValue::from`, so anything with a `From` conversion
/// works. Names are not validated until the entries are checked or signed.
///
/// ```
/// use pod_core::{pod_entries, PodValue};
///
/// let entries = pod_entries! {
///     "attack" => 7,
///     "itemSet" => "celestial",
///     "equipped" => true,
/// };
/// assert_eq!(entries.get("attack"), Some(&PodValue::from(7)));
/// ```
#[macro_export]
macro_rules! pod_entries {
    ($($name:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut entries = $crate::PodEntries::new();
        $(
            entries.insert($name, $crate::PodValue::from($value));
        )*
        entries
    }};
}
