//! Handles the search box is bound to, and their validation.

use sitesearch_render::ResultsContainer;

use crate::error::SearchBoxError;

/// The metadata line showing the placeholder or the result count.
pub trait MetaDisplay {
    fn set_text(&mut self, text: &str);

    /// Whether the element is still attached to its surface.
    fn is_connected(&self) -> bool {
        true
    }
}

/// Metadata line kept in memory.
#[derive(Debug, Clone)]
pub struct MemoryMeta {
    pub text: String,
    pub connected: bool,
}

impl Default for MemoryMeta {
    fn default() -> Self {
        Self {
            text: String::new(),
            connected: true,
        }
    }
}

impl MetaDisplay for MemoryMeta {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Check that both handles are attached and the container geometry is usable.
pub fn validate_bindings<C, M>(container: &C, meta: &M) -> Result<(), SearchBoxError>
where
    C: ResultsContainer + ?Sized,
    M: MetaDisplay + ?Sized,
{
    if !container.is_connected() {
        return Err(SearchBoxError::InvalidBinding(
            "results container is detached".to_string(),
        ));
    }
    if !meta.is_connected() {
        return Err(SearchBoxError::InvalidBinding(
            "metadata element is detached".to_string(),
        ));
    }
    let metrics = container.metrics();
    if !metrics.is_valid() {
        return Err(SearchBoxError::InvalidBinding(format!(
            "results container reports unusable geometry: {:?}",
            metrics
        )));
    }
    Ok(())
}
