//! Mapping from `ferrous_rdns_domain::RecordType` to `hickory_proto::rr::RecordType`

use ferrous_rdns_domain::RecordType;
use hickory_proto::rr::RecordType as HickoryRecordType;

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    /// Convert domain RecordType → hickory RecordType (for building queries)
    pub fn to_hickory(record_type: &RecordType) -> HickoryRecordType {
        match record_type {
            RecordType::A => HickoryRecordType::A,
            RecordType::PTR => HickoryRecordType::PTR,
        }
    }
}
