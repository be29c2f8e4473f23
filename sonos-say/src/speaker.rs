//! Sonos playback control via the UPnP AVTransport SOAP service.

use std::time::Duration;

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SpeakerConfig;

const AV_TRANSPORT: &str = "urn:schemas-upnp-org:service:AVTransport:1";
const CONTROL_PATH: &str = "/MediaRenderer/AVTransport/Control";

#[derive(Debug, Error)]
pub enum SpeakerError {
    #[error("could not reach speaker at {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{action} rejected with HTTP {status} (UPnP error {})", .code.as_deref().unwrap_or("unknown"))]
    Fault {
        action: &'static str,
        status: StatusCode,
        code: Option<String>,
    },
}

/// A device that can be told to play a URI.
pub trait Player {
    fn play_uri(&self, uri: &str) -> Result<(), SpeakerError>;
}

pub struct SonosSpeaker {
    client: Client,
    url: String,
}

impl SonosSpeaker {
    pub fn new(config: &SpeakerConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let url = format!("http://{}:{}{CONTROL_PATH}", config.address, config.port);

        Ok(Self { client, url })
    }

    fn send_command(&self, action: &'static str, args: &str) -> Result<(), SpeakerError> {
        debug!("AVTransport {action} → {}", self.url);

        let resp = self
            .client
            .post(&self.url)
            .header("Content-Type", "text/xml; charset=\"utf-8\"")
            .header("SOAPACTION", format!("\"{AV_TRANSPORT}#{action}\""))
            .body(soap_envelope(action, args))
            .send()
            .map_err(|source| SpeakerError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().unwrap_or_default();
        Err(SpeakerError::Fault {
            action,
            status,
            code: upnp_error_code(&body),
        })
    }
}

impl Player for SonosSpeaker {
    fn play_uri(&self, uri: &str) -> Result<(), SpeakerError> {
        let args = format!(
            "<InstanceID>0</InstanceID>\
             <CurrentURI>{}</CurrentURI>\
             <CurrentURIMetaData></CurrentURIMetaData>",
            escape(uri)
        );
        self.send_command("SetAVTransportURI", &args)?;
        self.send_command("Play", "<InstanceID>0</InstanceID><Speed>1</Speed>")?;

        info!("Speaker playing {uri}");
        Ok(())
    }
}

fn soap_envelope(action: &str, args: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\
         <s:Envelope xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\" \
         s:encodingStyle=\"http://schemas.xmlsoap.org/soap/encoding/\">\
         <s:Body><u:{action} xmlns:u=\"{AV_TRANSPORT}\">{args}</u:{action}></s:Body>\
         </s:Envelope>"
    )
}

/// Pull `<errorCode>` out of a UPnP SOAP fault body.
fn upnp_error_code(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let mut in_code = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => in_code = e.local_name().as_ref() == b"errorCode",
            Ok(Event::Text(ref e)) if in_code => {
                return e.unescape().ok().map(|t| t.trim().to_string());
            }
            Ok(Event::End(_)) => in_code = false,
            Ok(Event::Eof) => return None,
            Err(_) => return None,
            _ => (),
        }
    }
}
