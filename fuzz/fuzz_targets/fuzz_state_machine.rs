#![no_main]

use libfuzzer_sys::fuzz_target;
use typewriter::engine::{PhraseList, Typewriter, TypewriterConfig};

// First byte picks finite/infinite, the rest is split into phrases on NUL.
// The low bit of each op byte chooses between a tick and a caret toggle.
fuzz_target!(|data: &[u8]| {
    let Some((&flags, rest)) = data.split_first() else {
        return;
    };
    let (text, ops) = rest.split_at(rest.len() / 2);
    let text = String::from_utf8_lossy(text);
    let Ok(phrases) = PhraseList::new(text.split('\0')) else {
        return;
    };

    let config = TypewriterConfig::default().with_infinite(flags & 1 == 0);
    let mut machine = Typewriter::new(phrases, config);

    for op in ops {
        if op & 1 == 0 {
            machine.advance();
        } else {
            machine.toggle_caret();
        }
        let index = machine.phrase_index();
        assert!(index < machine.phrases().len());
        assert!(machine.cursor() <= machine.phrases().char_len(index));
        assert!(machine.phrases().get(index).unwrap_or("").starts_with(machine.visible_text()));
    }
});
