//! FragmentSlot port - `location.hash`

use super::key_value::AccessError;

/// The navigation fragment, without the leading `#`.
pub trait FragmentSlot {
    fn hash(&self) -> Result<String, AccessError>;

    fn set_hash(&self, value: &str) -> Result<(), AccessError>;
}
