use std::io::Write;

use async_trait::async_trait;

use crate::xml;
use ta_common::error::{TaError, TaResult};

/// One record handed to the host, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkEvent {
    pub stanza: String,
    pub source: String,
    pub data: String,
}

#[async_trait]
pub trait EventSink: Send {
    /// Append one event. Once this returns `Ok` the event belongs to the host.
    async fn write_event(&mut self, event: SinkEvent) -> TaResult<()>;

    /// Finish the stream. Called once after the last event.
    async fn close(&mut self) -> TaResult<()> {
        Ok(())
    }
}

#[async_trait]
impl<S: EventSink + ?Sized> EventSink for &mut S {
    async fn write_event(&mut self, event: SinkEvent) -> TaResult<()> {
        (**self).write_event(event).await
    }

    async fn close(&mut self) -> TaResult<()> {
        (**self).close().await
    }
}

/// Writes events in the host's XML streaming format:
/// `<stream><event stanza=".."><source>..</source><data>..</data></event>...</stream>`.
pub struct XmlEventWriter<W> {
    out: W,
    header_written: bool,
}

impl<W: Write + Send> XmlEventWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[async_trait]
impl<W: Write + Send> EventSink for XmlEventWriter<W> {
    async fn write_event(&mut self, event: SinkEvent) -> TaResult<()> {
        let mut chunk = String::new();
        if !self.header_written {
            chunk.push_str("<stream>");
        }
        chunk.push_str(&format!(
            "<event stanza=\"{}\"><source>{}</source><data>{}</data></event>",
            xml::attribute(&event.stanza),
            xml::text(&event.source),
            xml::text(&event.data)
        ));

        self.out
            .write_all(chunk.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| TaError::Sink(e.to_string()))?;
        self.header_written = true;
        Ok(())
    }

    async fn close(&mut self) -> TaResult<()> {
        if self.header_written {
            self.out
                .write_all(b"</stream>")
                .and_then(|()| self.out.flush())
                .map_err(|e| TaError::Sink(e.to_string()))?;
            self.header_written = false;
        }
        Ok(())
    }
}
