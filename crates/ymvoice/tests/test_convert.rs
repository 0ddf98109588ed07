//! Cross-dialect conversion tests.

use pretty_assertions::assert_eq;
use ymvoice::convert::{narrow_rate, widen_rate};
use ymvoice::{
    convert, ConvertOptions, Dialect, OplSlotParam, OplVoice, OpllVoice, OpmVoice, OpnSlotParam,
    OpnVoice, RomBank, Voice, YmVoice,
};

/// YM2413 guitar as an OPL voice.
fn guitar() -> OplVoice {
    OplVoice::decode(&[
        0x13, 0x41, 0x1a, 0x00, 0xd8, 0xf7, 0x23, 0x13, 0x01, 0x00, 0x0a,
    ])
}

fn opn_voice(con: u8) -> OpnVoice {
    let mut voice = OpnVoice {
        fb: 4,
        con,
        ams: 1,
        pms: 3,
        ..Default::default()
    };
    for (i, slot) in voice.slots.iter_mut().enumerate() {
        *slot = OpnSlotParam {
            dt: i as u8,
            ml: 2 * i as u8 + 1,
            tl: 8 * i as u8,
            ks: 2,
            ar: 31,
            am: (i % 2) as u8,
            dr: 12,
            sr: 6,
            sl: 5,
            rr: 9,
            ssg: 0,
        };
    }
    voice
}

// =============================================================================
// 1. Rate remapping
// =============================================================================

#[test]
fn rate_remaps_fix_extremes() {
    assert_eq!((widen_rate(0), widen_rate(15)), (0, 31));
    assert_eq!((narrow_rate(0), narrow_rate(31)), (0, 15));
}

#[test]
fn widened_rates_narrow_back_close() {
    for r in 1..15u8 {
        let back = narrow_rate(widen_rate(r));
        assert!((back as i32 - r as i32).abs() <= 1, "{} -> {}", r, back);
    }
}

// =============================================================================
// 2. Two-operator sources
// =============================================================================

#[test]
fn opl_fm_voice_to_opn() {
    let opn = guitar().to_opn();
    assert_eq!(opn.con, 2);
    // modulator waveform 1 boosts feedback 5 to the 7 cap
    assert_eq!(opn.fb, 7);
    assert_eq!(opn.ams, 2);
    assert_eq!(opn.pms, 2);
    assert_eq!(opn.slots[1], OpnSlotParam::default());
    assert_eq!(opn.slots[2], OpnSlotParam::default());

    let m = &opn.slots[0];
    assert_eq!((m.ml, m.tl, m.ks), (3, 31, 2));
    assert_eq!((m.ar, m.dr, m.sr, m.rr), (29, 19, 9, 0));
    let c = &opn.slots[3];
    assert_eq!((c.ml, c.tl, c.ks), (1, 0, 0));
    assert_eq!((c.ar, c.dr, c.sr, c.rr), (31, 17, 9, 8));
}

#[test]
fn opl_round_trips_through_opll() {
    let opl = OplVoice {
        fb: 3,
        con: 0,
        slots: [
            OplSlotParam {
                kl: 1,
                tl: 40,
                ws: 1,
                ..Default::default()
            },
            OplSlotParam {
                kl: 2,
                ml: 4,
                ..Default::default()
            },
        ],
    };
    assert_eq!(opl.to_opll().to_opl(), opl);
}

#[test]
fn opll_to_opm_goes_through_opn() {
    let opll = RomBank::Ym2413.voices()[7];
    assert_eq!(opll.to_opm(), opll.to_opn().to_opm());
    assert_eq!(opll.to_opm().con, 2);
}

// =============================================================================
// 3. Four-operator sources
// =============================================================================

#[test]
fn opm_opn_round_trip_drops_only_chip_specific_fields() {
    let mut opm = OpmVoice::decode(&[0x5a; 26]);
    let dt2_free = {
        let mut v = opm;
        for s in &mut v.slots {
            s.dt2 = 0;
        }
        v
    };
    assert_eq!(opm.to_opn().to_opm(), dt2_free);
    opm.slots[1].dt1 = 6;
    assert_eq!(opm.to_opn().slots[1].dt, 6);
}

#[test]
fn opn_to_opl_key_phases_differ_in_envelope() {
    let voice = opn_voice(4);
    let [on, _] = voice.to_opl(true);
    let [off, _] = voice.to_opl(false);
    assert_eq!(on.slots[0].eg, 0);
    assert_eq!(off.slots[0].eg, 1);
    assert_eq!(on.slots[0].rr, narrow_rate(6));
    assert_eq!(off.slots[0].rr, 9);
    assert_eq!(on.slots[0].kr, 1);
}

#[test]
fn opn_split_table() {
    let cases: [(u8, [u8; 2], [u8; 2], [u8; 4], [u8; 2]); 8] = [
        // con, first con/fb, second con/fb, ml of [v0s0, v0s1, v1s0, v1s1], tl of v0s1 and v1s1
        (0, [0, 4], [0, 0], [1, 3, 5, 7], [30, 24]),
        (1, [0, 4], [0, 0], [1, 5, 5, 7], [38, 24]),
        (2, [0, 4], [0, 0], [1, 7, 5, 7], [24, 24]),
        (3, [0, 4], [0, 0], [1, 3, 5, 7], [30, 24]),
        (4, [0, 4], [0, 0], [1, 3, 5, 7], [8, 24]),
        (5, [0, 4], [0, 4], [1, 3, 1, 7], [8, 24]),
        (6, [0, 4], [1, 0], [1, 3, 5, 7], [8, 24]),
        (7, [1, 4], [1, 0], [1, 3, 5, 7], [8, 24]),
    ];
    for (con, first, second, ml, tl) in cases {
        let [a, b] = opn_voice(con).to_opl(true);
        assert_eq!([a.con, a.fb], first, "con {}", con);
        assert_eq!([b.con, b.fb], second, "con {}", con);
        assert_eq!(
            [a.slots[0].ml, a.slots[1].ml, b.slots[0].ml, b.slots[1].ml],
            ml,
            "con {}",
            con
        );
        assert_eq!([a.slots[1].tl, b.slots[1].tl], tl, "con {}", con);
    }
}

#[test]
fn opm_to_opll_uses_first_opl_channel() {
    let opm = OpmVoice::decode(&[0x33; 26]);
    let out = convert(
        &Voice::Opm(opm),
        Dialect::Opll,
        &ConvertOptions::default().key_on(false),
    );
    let [first, _] = opm.to_opn().to_opl(false);
    assert_eq!(out, vec![Voice::Opll(first.to_opll())]);
}

// =============================================================================
// 4. Nearest ROM preset
// =============================================================================

#[test]
fn guitar_matches_guitar_preset() {
    let result = guitar().to_opll_rom(RomBank::Ym2413);
    assert_eq!(result.program, 2);
    assert_eq!(result.octave_offset, 0);
    assert_eq!(result.volume_offset, 1);
}

#[test]
fn sustained_source_never_matches_percussive_preset() {
    for bank in [RomBank::Ym2413, RomBank::Vrc7] {
        for program in 1..=15 {
            let mut voice = bank.voices()[program].to_opl();
            voice.slots[1].rr = 0;
            let result = voice.to_opll_rom(bank);
            let chosen: &OpllVoice = &bank.voices()[result.program as usize];
            assert!(result.program == 0 || chosen.slots[1].eg == 1);
            assert_ne!(result.program, 13);
        }
    }
}

#[test]
fn percussive_source_never_matches_sustained_preset() {
    for bank in [RomBank::Ym2413, RomBank::Vrc7] {
        for program in 1..=15 {
            let mut voice = bank.voices()[program].to_opl();
            voice.slots[1].rr = 5;
            let result = voice.to_opll_rom(bank);
            let chosen: &OpllVoice = &bank.voices()[result.program as usize];
            assert!(result.program == 0 || chosen.slots[1].eg == 0);
        }
    }
}
