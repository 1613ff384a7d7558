use super::panic_message;

fn payload_of(f: impl FnOnce() + std::panic::UnwindSafe) -> Box<dyn std::any::Any + Send> {
	std::panic::catch_unwind(f).expect_err("closure should panic")
}

#[test]
fn extracts_static_str_payload() {
	let payload = payload_of(|| panic!("boom-str"));
	let msg = panic_message(payload.as_ref());
	assert!(msg.contains("boom-str"), "expected 'boom-str', got: {msg}");
}

#[test]
fn extracts_string_payload() {
	let payload = payload_of(|| panic!("{}", String::from("boom-string")));
	let msg = panic_message(payload.as_ref());
	assert!(msg.contains("boom-string"), "expected 'boom-string', got: {msg}");
}

#[test]
fn falls_back_for_opaque_payloads() {
	let payload = payload_of(|| std::panic::panic_any(17u8));
	assert_eq!(panic_message(payload.as_ref()), "<non-string panic payload>");
}
