use ferrous_rdns_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RData;
use std::net::Ipv4Addr;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DnsResponse {
    /// A records of the answer section, in answer order
    pub ipv4: Vec<Ipv4Addr>,

    /// PTR targets of the answer section, in answer order, as sent on the wire
    pub ptr_names: Vec<String>,

    pub rcode: ResponseCode,

    pub truncated: bool,
}

impl DnsResponse {
    pub fn is_nxdomain(&self) -> bool {
        self.rcode == ResponseCode::NXDomain
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let rcode = message.response_code();
        let truncated = message.truncated();

        let mut ipv4 = Vec::new();
        let mut ptr_names = Vec::new();

        for record in message.answers() {
            match record.data() {
                RData::A(a) => {
                    ipv4.push(a.0);
                }
                RData::PTR(ptr) => {
                    ptr_names.push(ptr.to_ascii());
                }
                _ => {}
            }
        }

        debug!(
            rcode = ?rcode,
            addresses = ipv4.len(),
            ptr = ptr_names.len(),
            truncated = truncated,
            "DNS response parsed"
        );

        Ok(DnsResponse {
            ipv4,
            ptr_names,
            rcode,
            truncated,
        })
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rcode_to_status() {
        assert_eq!(ResponseParser::rcode_to_status(ResponseCode::NoError), "NOERROR");
        assert_eq!(ResponseParser::rcode_to_status(ResponseCode::NXDomain), "NXDOMAIN");
        assert_eq!(ResponseParser::rcode_to_status(ResponseCode::ServFail), "SERVFAIL");
    }

    #[test]
    fn test_parse_garbage_fails() {
        let result = ResponseParser::parse(&[0x00, 0x01, 0x02]);
        assert!(matches!(result, Err(DomainError::InvalidDnsResponse(_))));
    }
}
