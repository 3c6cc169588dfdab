#![no_main]

use advertizer::policy::advertizer::Advertizer;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on Advertizer
//
// First byte picks max_advertisements; the rest drives push, advertize,
// remove and clear.
fuzz_target!(|data: &[u8]| {
    let Some((&max, data)) = data.split_first() else {
        return;
    };
    let max = usize::from(max % 8) + 1;
    let mut adv: Advertizer<u8, u8> = Advertizer::new(max);

    let mut idx = 0;
    while idx + 2 < data.len() {
        let op = data[idx] % 5;
        let id = data[idx + 1] % 32;
        let payload = data[idx + 2];

        match op {
            0 => {
                // push
                let was_present = adv.contains(&id);
                let old_len = adv.len();
                adv.push(id, payload);
                assert_eq!(adv.get(&id), Some(&payload));
                assert_eq!(adv.advertize_count(&id), Some(0));
                assert_eq!(adv.len(), if was_present { old_len } else { old_len + 1 });
            }
            1 | 2 => {
                // advertize
                let old_len = adv.len();
                let peeked = adv.peek().map(|(k, v)| (*k, *v));
                match adv.advertize() {
                    Some(a) => {
                        let last = a.is_last();
                        let pair = (*a.id(), *a.payload());
                        assert_eq!(Some(pair), peeked);
                        if last {
                            assert_eq!(adv.len(), old_len - 1);
                            assert!(!adv.contains(&pair.0));
                        } else {
                            assert_eq!(adv.len(), old_len);
                        }
                    }
                    None => {
                        assert_eq!(old_len, 0);
                        assert!(peeked.is_none());
                    }
                }
            }
            3 => {
                // remove
                let old_len = adv.len();
                let expected = adv.get(&id).copied();
                assert_eq!(adv.remove(&id), expected);
                if expected.is_some() {
                    assert_eq!(adv.len(), old_len - 1);
                } else {
                    assert_eq!(adv.len(), old_len);
                }
            }
            4 => {
                if payload == 0 {
                    adv.clear();
                    assert!(adv.is_empty());
                }
            }
            _ => unreachable!(),
        }

        #[cfg(debug_assertions)]
        adv.check_invariants().unwrap();

        idx += 3;
    }
});
