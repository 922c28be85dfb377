//! Host-facing plumbing shared by every input of the add-on: the scheme
//! declaration, stanza definitions, the XML event stream and the CLI driver.

pub mod definition;
pub mod host;
pub mod scheme;
pub mod sink;
pub mod xml;

pub use definition::{InputDefinition, InputParameters, StanzaName};
pub use host::{main_with, ModularInput};
pub use scheme::{validate_interval, Argument, Scheme, SchemeDescriptor, MINIMAL_INTERVAL};
pub use sink::{EventSink, SinkEvent, XmlEventWriter};
