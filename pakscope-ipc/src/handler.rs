//! Request execution
//!
//! Maps each inspector request onto a session operation and turns the
//! outcome into the event written back. Failures become `error` events;
//! nothing is retried.

use pakscope_core::{InspectorEvent, InspectorRequest, PacketRecord, Result};
use pakscope_session::Session;
use tracing::{debug, warn};

/// Run one decoded request
///
/// Returns `None` for requests that need no answer (a dispatched action).
pub async fn execute(session: &Session, request: InspectorRequest) -> Result<Option<InspectorEvent>> {
    let event = match request {
        InspectorRequest::StartProxy { platform } => {
            session.start(&platform)?;
            Some(InspectorEvent::UpdateFiltering)
        }
        InspectorRequest::StopProxy => {
            session.stop()?;
            Some(InspectorEvent::ProxyStopped)
        }
        InspectorRequest::RequestPacketDetails(request) => {
            let record = session.packet_details(request)?;
            Some(InspectorEvent::PacketDetails(PacketRecord::clone(&record)))
        }
        InspectorRequest::ProxyCapabilities => {
            Some(InspectorEvent::ProxyCapabilities(session.capabilities()?))
        }
        InspectorRequest::ContextMenu(request) => Some(InspectorEvent::ContextMenu {
            entries: session.context_menu(&request)?,
        }),
        InspectorRequest::SelectAction(command) => {
            session.dispatch(command).await?;
            None
        }
        InspectorRequest::Status => Some(InspectorEvent::Status(session.status())),
    };
    Ok(event)
}

/// Parse and run one request line, folding every failure into an error event
pub async fn handle_line(session: &Session, line: &str) -> Option<InspectorEvent> {
    let request = match InspectorRequest::parse(line) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Invalid inspector request");
            return Some(InspectorEvent::error(e));
        }
    };

    debug!(?request, "Inspector request");
    match execute(session, request).await {
        Ok(event) => event,
        Err(e) => {
            debug!(error = %e, "Request failed");
            Some(InspectorEvent::error(e))
        }
    }
}
