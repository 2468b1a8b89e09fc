/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 9/6/26
******************************************************************************/

//! Stateful decode sessions.
//!
//! A [`DecodeSession`] pairs a shared template store with its own
//! dictionary and walks framed FAST messages: presence map, template id,
//! then the template's field units. Sessions are single-threaded by
//! construction; one stream of messages maps to one session so prior
//! values accumulate in decode order.

use ferrofast_codec::{Cursor, PresenceMap, reader};
use ferrofast_core::{DecodeError, Message};
use ferrofast_operator::Dictionary;
use ferrofast_template::TemplateStore;
use std::sync::Arc;
use tracing::{debug, trace};

/// A decoding session over a shared template store.
///
/// The session owns the dictionary, so operators that depend on prior
/// values (copy, increment, delta, tail) see the history of every
/// message this session has decoded since the last [`reset`].
///
/// [`reset`]: DecodeSession::reset
#[derive(Debug, Clone)]
pub struct DecodeSession {
    store: Arc<TemplateStore>,
    dictionary: Dictionary,
}

impl DecodeSession {
    /// Creates a session with an empty dictionary.
    #[must_use]
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self {
            store,
            dictionary: Dictionary::new(),
        }
    }

    /// Deserialises one framed message from `input`.
    ///
    /// The frame is the message's presence map followed by the template
    /// id and the field body. Trailing bytes beyond the message are
    /// ignored; use [`decode_from`] to consume a stream of messages
    /// from one buffer.
    ///
    /// [`decode_from`]: DecodeSession::decode_from
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the header is malformed, the
    /// template id is unknown, or any field fails to decode. The
    /// dictionary keeps the slots written before the failure.
    pub fn decode(&mut self, input: &[u8]) -> Result<Message, DecodeError> {
        let mut cursor = Cursor::new(input);
        self.decode_from(&mut cursor)
    }

    /// Deserialises the next framed message at the cursor.
    ///
    /// Decodes the presence map, requires its first bit to announce a
    /// template id, reads the id, and hands the rest of the map to the
    /// resolved template. The cursor stops on the first byte after the
    /// message, so back-to-back frames decode by calling this in a loop.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MissingTemplateId`] if the map's first
    /// bit is unset, [`DecodeError::UnknownTemplate`] if the store has
    /// no template under the id, and forwards field decode failures
    /// with their field context.
    pub fn decode_from(&mut self, cursor: &mut Cursor<'_>) -> Result<Message, DecodeError> {
        let mut pmap = PresenceMap::decode(cursor)?;
        if !pmap.next_bit() {
            return Err(DecodeError::MissingTemplateId);
        }
        let template_id = reader::read_uint32(cursor)?;
        let template = self
            .store
            .get(template_id)
            .ok_or(DecodeError::UnknownTemplate(template_id))?;
        trace!(
            "Deserialising message with template {} ({})",
            template_id,
            template.name()
        );
        let message = template.deserialise(cursor, &mut pmap, &mut self.dictionary)?;
        debug!(
            "Deserialised {} fields with template {}",
            message.len(),
            template_id
        );
        Ok(message)
    }

    /// Clears every dictionary slot back to undefined.
    ///
    /// Call between logical streams, or after a transport gap when the
    /// feed re-sends full state.
    pub fn reset(&mut self) {
        self.dictionary.reset();
        debug!("Session dictionary reset");
    }

    /// The session's dictionary.
    #[must_use]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// The template store this session decodes against.
    #[must_use]
    pub fn store(&self) -> &TemplateStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FastEngine;
    use ferrofast_core::{FieldProperties, Value};
    use ferrofast_operator::{DictEntry, Operator};
    use ferrofast_template::TemplateBuilder;

    fn heartbeat_template(id: u32, seq_required: bool) -> ferrofast_template::Template {
        let seq = if seq_required {
            FieldProperties::required(34, "MsgSeqNum")
        } else {
            FieldProperties::optional(34, "MsgSeqNum")
        };
        TemplateBuilder::new(id, "Heartbeat")
            .ascii(
                FieldProperties::required(1128, "ApplVerID"),
                Operator::Constant(Value::from("9")),
            )
            .ascii(
                FieldProperties::required(35, "MsgType"),
                Operator::Constant(Value::from("0")),
            )
            .uint32(seq, Operator::None)
            .uint64(FieldProperties::required(52, "SendingTime"), Operator::None)
            .build()
            .unwrap()
    }

    fn session_for(template: ferrofast_template::Template) -> DecodeSession {
        FastEngine::builder().add_template(template).build().session()
    }

    #[test]
    fn test_decode_constant_heartbeat() {
        let mut session = session_for(heartbeat_template(144, true));

        let message = session.decode(&[0xC0, 0x01, 0x90, 0x8A, 0x8B]).unwrap();

        assert_eq!(message.get(1128), Some(&Value::from("9")));
        assert_eq!(message.get(35), Some(&Value::from("0")));
        assert_eq!(message.get(34), Some(&Value::UInt32(10)));
        assert_eq!(message.get(52), Some(&Value::UInt64(11)));
    }

    #[test]
    fn test_decode_optional_field_null() {
        let mut session = session_for(heartbeat_template(144, false));

        let message = session.decode(&[0xC0, 0x01, 0x90, 0x80, 0x8A]).unwrap();

        assert_eq!(message.get(34), Some(&Value::Null));
        assert_eq!(message.get(52), Some(&Value::UInt64(10)));
    }

    #[test]
    fn test_decode_unknown_template() {
        let mut session = session_for(heartbeat_template(144, true));

        let err = session.decode(&[0xC0, 0x07, 0xE7]).unwrap_err();

        assert_eq!(err, DecodeError::UnknownTemplate(999));
        assert_eq!(
            err.to_string(),
            "no template found in store to deserialise message with ID: 999"
        );
    }

    #[test]
    fn test_decode_missing_template_id() {
        let mut session = session_for(heartbeat_template(144, true));

        let err = session.decode(&[0x80]).unwrap_err();

        assert_eq!(err, DecodeError::MissingTemplateId);
    }

    #[test]
    fn test_decode_empty_input() {
        let mut session = session_for(heartbeat_template(144, true));

        assert_eq!(session.decode(&[]).unwrap_err(), DecodeError::Underflow);
    }

    #[test]
    fn test_decode_sequence_of_groups() {
        let template = TemplateBuilder::new(60, "Snapshot")
            .sequence(
                FieldProperties::required(1, "Entries"),
                Operator::None,
                vec![
                    ferrofast_template::FieldUnit::Int64(ferrofast_template::ScalarField::new(
                        FieldProperties::required(2, "EntrySize"),
                        Operator::None,
                    )),
                    ferrofast_template::FieldUnit::Ascii(ferrofast_template::ScalarField::new(
                        FieldProperties::required(3, "EntryLabel"),
                        Operator::None,
                    )),
                ],
            )
            .build()
            .unwrap();
        let mut session = session_for(template);

        let message = session
            .decode(&[
                0xC0, 0xBC, 0x82, 0x83, 0x54, 0x45, 0x53, 0x54, 0xB1, 0x82, 0x54, 0x45, 0x53,
                0x54, 0xB2,
            ])
            .unwrap();

        let entries = message.get(1).and_then(Value::as_sequence).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].get(2), Some(&Value::Int64(3)));
        assert_eq!(entries[0].get(3), Some(&Value::from("TEST1")));
        assert_eq!(entries[1].get(2), Some(&Value::Int64(2)));
        assert_eq!(entries[1].get(3), Some(&Value::from("TEST2")));
    }

    #[test]
    fn test_decode_delta_overflow_reports_width() {
        let template = TemplateBuilder::new(70, "DeltaTick")
            .int32(
                FieldProperties::required(271, "NetChange"),
                Operator::Delta(None),
            )
            .build()
            .unwrap();
        let mut session = session_for(template);

        // First frame carries a delta of i32::MAX against a zero base.
        let first = session
            .decode(&[0xC0, 0xC6, 0x07, 0x7F, 0x7F, 0x7F, 0xFF])
            .unwrap();
        assert_eq!(first.get(271), Some(&Value::Int32(i32::MAX)));

        let err = session.decode(&[0xC0, 0xC6, 0x81]).unwrap_err();

        assert_eq!(
            err.root_cause().to_string(),
            "1 + 2147483647 would overflow int32"
        );
    }

    #[test]
    fn test_decode_tail_replaces_suffix_of_initial() {
        let template = TemplateBuilder::new(80, "NewsLine")
            .ascii(
                FieldProperties::required(58, "Text"),
                Operator::Tail(Some(Value::from("TEST: TEST1"))),
            )
            .build()
            .unwrap();
        let mut session = session_for(template);

        let message = session
            .decode(&[0xE0, 0xD0, 0x54, 0x45, 0x53, 0x54, 0xB2])
            .unwrap();

        assert_eq!(message.get(58), Some(&Value::from("TEST: TEST2")));
    }

    #[test]
    fn test_copy_values_survive_across_messages() {
        let template = TemplateBuilder::new(90, "Quote")
            .uint32(
                FieldProperties::required(34, "MsgSeqNum"),
                Operator::Copy(None),
            )
            .ascii(
                FieldProperties::required(55, "Symbol"),
                Operator::Copy(None),
            )
            .build()
            .unwrap();
        let mut session = session_for(template);

        let first = session
            .decode(&[0xF0, 0xDA, 0x8A, 0x45, 0x55, 0x52, 0x55, 0x53, 0xC4])
            .unwrap();
        assert_eq!(first.get(34), Some(&Value::UInt32(10)));
        assert_eq!(first.get(55), Some(&Value::from("EURUSD")));

        // Both copy bits unset: the prior message's values come back.
        let second = session.decode(&[0xC0, 0xDA]).unwrap();
        assert_eq!(second.get(34), Some(&Value::UInt32(10)));
        assert_eq!(second.get(55), Some(&Value::from("EURUSD")));

        // A fresh sequence number, the symbol still copied.
        let third = session.decode(&[0xE0, 0xDA, 0x8B]).unwrap();
        assert_eq!(third.get(34), Some(&Value::UInt32(11)));
        assert_eq!(third.get(55), Some(&Value::from("EURUSD")));
    }

    #[test]
    fn test_reset_clears_prior_values() {
        let template = TemplateBuilder::new(90, "Quote")
            .uint32(
                FieldProperties::required(34, "MsgSeqNum"),
                Operator::Copy(None),
            )
            .build()
            .unwrap();
        let mut session = session_for(template);

        session.decode(&[0xE0, 0xDA, 0x8A]).unwrap();
        assert_eq!(
            session.dictionary().get("MsgSeqNum"),
            &DictEntry::Assigned(Value::UInt32(10))
        );

        session.reset();
        assert!(session.dictionary().get("MsgSeqNum").is_undefined());

        // With no prior and no initial value an unset copy bit is fatal.
        let err = session.decode(&[0xC0, 0xDA]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "field MsgSeqNum (id 34, copy operator): field is mandatory but has no prior or initial value"
        );
    }

    #[test]
    fn test_sessions_keep_independent_dictionaries() {
        let engine = FastEngine::builder()
            .add_template(heartbeat_template(144, true))
            .build();
        let mut first = engine.session();
        let mut second = engine.session();

        first.decode(&[0xC0, 0x01, 0x90, 0x8A, 0x8B]).unwrap();

        assert_eq!(
            first.dictionary().get("MsgSeqNum"),
            &DictEntry::Assigned(Value::UInt32(10))
        );
        assert!(second.dictionary().get("MsgSeqNum").is_undefined());
        second.decode(&[0xC0, 0x01, 0x90, 0x99, 0x8B]).unwrap();
        assert_eq!(
            second.dictionary().get("MsgSeqNum"),
            &DictEntry::Assigned(Value::UInt32(25))
        );
    }

    #[test]
    fn test_decode_from_consumes_back_to_back_frames() {
        let mut session = session_for(heartbeat_template(144, true));
        let stream = [
            0xC0, 0x01, 0x90, 0x8A, 0x8B, // first frame
            0xC0, 0x01, 0x90, 0x8B, 0x8C, // second frame
        ];
        let mut cursor = Cursor::new(&stream);

        let mut sequence_numbers = Vec::new();
        while !cursor.is_empty() {
            let message = session.decode_from(&mut cursor).unwrap();
            sequence_numbers.push(message.get(34).and_then(Value::as_u32).unwrap());
        }

        assert_eq!(sequence_numbers, vec![10, 11]);
    }

    #[test]
    fn test_failed_decode_keeps_earlier_dictionary_writes() {
        let template = TemplateBuilder::new(91, "Pair")
            .uint32(
                FieldProperties::required(34, "MsgSeqNum"),
                Operator::Copy(None),
            )
            .ascii(FieldProperties::required(55, "Symbol"), Operator::None)
            .build()
            .unwrap();
        let mut session = session_for(template);

        // The sequence number lands before the truncated symbol fails.
        let err = session.decode(&[0xE0, 0xDB, 0x8A, 0x45]).unwrap_err();

        assert_eq!(err.root_cause(), &DecodeError::Underflow);
        assert_eq!(
            session.dictionary().get("MsgSeqNum"),
            &DictEntry::Assigned(Value::UInt32(10))
        );
    }
}
