use super::message::{
    message_type, option_code, DhcpMessage, MalformedPacket, OpCode, BROADCAST_FLAG, FRAME_SIZE,
    MAGIC_COOKIE, OPTIONS_CAPACITY,
};
use std::net::Ipv4Addr;

const MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x00];

#[test]
fn test_discover_round_trip() {
    let msg = DhcpMessage::discover(0x12345678, &MAC);
    let frame = msg.encode();

    let decoded = DhcpMessage::decode(&frame).unwrap();

    assert_eq!(decoded.xid, 0x12345678);
    assert_eq!(decoded.chaddr[..6], MAC);
    assert_eq!(decoded.chaddr[6..], [0u8; 10]);
    assert_eq!(decoded.op, OpCode::Request);
    assert_eq!(decoded.htype, 1);
    assert_eq!(decoded.hlen, 6);
    assert_eq!(decoded.secs, 0);
    assert_eq!(decoded.flags, BROADCAST_FLAG);
    assert!(decoded.broadcast());
    assert_eq!(decoded.ciaddr, Ipv4Addr::UNSPECIFIED);
    assert_eq!(decoded.yiaddr, Ipv4Addr::UNSPECIFIED);
    assert_eq!(decoded.siaddr, Ipv4Addr::UNSPECIFIED);
    assert_eq!(decoded.giaddr, Ipv4Addr::UNSPECIFIED);
}

#[test]
fn test_discover_frame_is_constant_size() {
    for mac in [[0u8; 6], MAC, [0xff; 6]] {
        let frame = DhcpMessage::discover(rand::random(), &mac).encode();
        assert_eq!(frame.len(), FRAME_SIZE);
        assert_eq!(frame.len(), 548);
    }
}

#[test]
fn test_discover_options_layout() {
    let msg = DhcpMessage::discover(1, &MAC);

    assert_eq!(msg.options[..4], MAGIC_COOKIE);
    assert!(msg.has_magic_cookie());

    // Message type TLV: code 53, length 1, value DISCOVER.
    assert_eq!(msg.options[4], option_code::MESSAGE_TYPE);
    assert_eq!(msg.options[5], 1);
    assert_eq!(msg.options[6], message_type::DISCOVER);
    assert_eq!(msg.message_type(), Some(message_type::DISCOVER));

    // Requested address TLV: code 50, length 4, value 0.0.0.0.
    assert_eq!(msg.options[7], option_code::REQUESTED_ADDRESS);
    assert_eq!(msg.options[8], 4);
    assert_eq!(
        msg.option(option_code::REQUESTED_ADDRESS),
        Some(&[0u8, 0, 0, 0][..])
    );

    // Everything after the two TLVs stays zero.
    assert!(msg.options[13..].iter().all(|&b| b == 0));
}

#[test]
fn test_decode_rejects_wrong_sizes() {
    for len in [0, FRAME_SIZE - 1, FRAME_SIZE + 1] {
        let buf = vec![1u8; len];
        match DhcpMessage::decode(&buf) {
            Err(MalformedPacket::WrongSize(n)) => assert_eq!(n, len),
            other => panic!("expected WrongSize for {len} bytes, got {other:?}"),
        }
    }
}

#[test]
fn test_decode_rejects_unknown_op_code() {
    let mut frame = DhcpMessage::discover(7, &MAC).encode().to_vec();
    frame[0] = 3;
    assert!(matches!(
        DhcpMessage::decode(&frame),
        Err(MalformedPacket::BadOpCode(3))
    ));
}

#[test]
fn test_decode_offer_reply() {
    let mut msg = DhcpMessage::discover(0xdeadbeef, &MAC);
    msg.op = OpCode::Reply;
    msg.yiaddr = Ipv4Addr::new(192, 168, 1, 100);
    msg.siaddr = Ipv4Addr::new(192, 168, 1, 1);
    msg.options[6] = message_type::OFFER;
    msg.options[13] = option_code::SERVER_IDENTIFIER;
    msg.options[14] = 4;
    msg.options[15..19].copy_from_slice(&[192, 168, 1, 1]);

    let decoded = DhcpMessage::decode(&msg.encode()).unwrap();

    assert_eq!(decoded.op, OpCode::Reply);
    assert_eq!(decoded.xid, 0xdeadbeef);
    assert_eq!(decoded.yiaddr, Ipv4Addr::new(192, 168, 1, 100));
    assert_eq!(decoded.message_type(), Some(message_type::OFFER));
    assert_eq!(
        decoded.server_identifier(),
        Some(Ipv4Addr::new(192, 168, 1, 1))
    );
}

#[test]
fn test_option_scan_skips_pad_and_stops_at_end() {
    let mut msg = DhcpMessage::discover(1, &MAC);

    // Rewrite the window: cookie, pad, pad, one TLV, end, then a TLV
    // that must never be reached.
    msg.options = [0u8; OPTIONS_CAPACITY];
    msg.options[..4].copy_from_slice(&MAGIC_COOKIE);
    msg.options[6] = option_code::MESSAGE_TYPE;
    msg.options[7] = 1;
    msg.options[8] = message_type::OFFER;
    msg.options[9] = option_code::END;
    msg.options[10] = option_code::SERVER_IDENTIFIER;
    msg.options[11] = 4;

    assert_eq!(msg.message_type(), Some(message_type::OFFER));
    assert_eq!(msg.server_identifier(), None);
}

#[test]
fn test_option_scan_rejects_truncated_value() {
    let mut msg = DhcpMessage::discover(1, &MAC);

    msg.options = [0u8; OPTIONS_CAPACITY];
    msg.options[..4].copy_from_slice(&MAGIC_COOKIE);
    // TLV at the tail of the window whose declared length runs past the
    // boundary; the pads before it are skipped one by one.
    msg.options[OPTIONS_CAPACITY - 2] = option_code::SERVER_IDENTIFIER;
    msg.options[OPTIONS_CAPACITY - 1] = 4;

    assert_eq!(msg.option(option_code::SERVER_IDENTIFIER), None);
}

#[test]
fn test_option_lookup_without_cookie() {
    let mut msg = DhcpMessage::discover(1, &MAC);
    msg.options[0] = 0;

    assert!(!msg.has_magic_cookie());
    assert_eq!(msg.message_type(), None);
}
