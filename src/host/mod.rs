use futures::future::BoxFuture;

use crate::core::{
    errors::AppResult,
    types::{DocumentNode, FontName, UiMessage},
};

pub mod snapshot;

pub use snapshot::{DocumentSnapshot, HostEvent, SnapshotHost};

pub trait DocumentHost: Send + Sync {
    /// Currently selected nodes, in selection order.
    fn selection(&self) -> Vec<&DocumentNode>;

    /// Prepare a font so that text set in it can be read.
    fn load_font<'a>(&'a self, font: &'a FontName) -> BoxFuture<'a, AppResult<()>>;

    /// Text content of a text node. Fails when the node's font was not
    /// prepared through [`DocumentHost::load_font`] first.
    fn characters<'a>(&'a self, node: &'a DocumentNode) -> AppResult<&'a str>;

    fn notify(&self, message: &str);

    fn post_message(&self, message: UiMessage);
}
