use crate::practice::PracticeStore;
use crate::speech::SpeechStore;
use crate::user::UserStore;

/// Everything the HTTP layer needs from persistence.
pub trait FullStore: UserStore + SpeechStore + PracticeStore {}

impl<T: UserStore + SpeechStore + PracticeStore> FullStore for T {}
