#![forbid(unsafe_code)]

//! Background-script routing of extension commands.

use crate::message::InboundMessage;

/// Name of the extension command bound to the palette shortcut.
pub const OPEN_PALETTE_COMMAND: &str = "open-palette";

/// Decide whether an extension command should reach the tab's palette.
///
/// Only [`OPEN_PALETTE_COMMAND`] is routed, and only to tabs on
/// `host_origin`. A tab whose URL is unknown (the extension lacks the `tabs`
/// permission for it) is still routed; the content script only exists on the
/// host app anyway.
#[must_use]
pub fn route_command(
    command: &str,
    tab_url: Option<&str>,
    host_origin: &str,
) -> Option<InboundMessage> {
    if tab_url.is_some_and(|url| !url.starts_with(host_origin)) {
        tracing::trace!(command, "command ignored outside host origin");
        return None;
    }
    (command == OPEN_PALETTE_COMMAND).then_some(InboundMessage::OpenPalette)
}
