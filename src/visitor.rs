//! Visitor capability set for decoded messages.

use crate::messages::{
    BulkPull, BulkPullAccount, BulkPush, ConfirmAck, ConfirmReq, FrontierReq, Keepalive,
    NodeIdHandshake, Publish,
};

/// Consumer of validated messages, one capability per message type.
///
/// The parser hands each fully validated message to exactly one of these
/// methods and never calls any of them for a buffer whose status is not
/// success. Methods default to no-ops so a consumer only implements the
/// capabilities it cares about; a realtime handler can ignore the
/// bootstrap methods and vice versa.
pub trait MessageVisitor {
    /// A keepalive was received.
    fn keepalive(&mut self, _message: &Keepalive) {}

    /// A block broadcast was received and passed the work check.
    fn publish(&mut self, _message: &Publish) {}

    /// A vote request was received and passed the work check.
    fn confirm_req(&mut self, _message: &ConfirmReq) {}

    /// A vote was received; every inline block passed the work check.
    fn confirm_ack(&mut self, _message: &ConfirmAck) {}

    /// A frontier enumeration request was received.
    fn frontier_req(&mut self, _message: &FrontierReq) {}

    /// A chain segment request was received.
    fn bulk_pull(&mut self, _message: &BulkPull) {}

    /// A pending-entries request was received.
    fn bulk_pull_account(&mut self, _message: &BulkPullAccount) {}

    /// A push announcement was received.
    fn bulk_push(&mut self, _message: &BulkPush) {}

    /// A node identity handshake was received.
    fn node_id_handshake(&mut self, _message: &NodeIdHandshake) {}
}
