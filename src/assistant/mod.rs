pub mod profile;
pub mod proxy;
pub mod session;
pub mod transport;

pub use profile::{ ProfileKind, SessionProfile };
pub use proxy::{ AssistantProxy, ProxyOutcome, FALLBACK_REPLY };
pub use session::{ ChatSession, SessionError, SessionState, TurnOutcome };
pub use transport::{ HttpProxyTransport, ProxyTransport, TransportError };
