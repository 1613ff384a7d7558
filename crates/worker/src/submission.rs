/// How a call reaches a worker's queue, recorded on submission traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Submission {
	/// Enqueued inline on the calling thread, in program order.
	Blockable,
	/// Enqueued later by a helper job, with no ordering guarantee.
	Unblockable,
}

impl Submission {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Blockable => "blockable",
			Self::Unblockable => "unblockable",
		}
	}
}
