//! Line-oriented VOPM reader.

use std::sync::OnceLock;

use regex::Regex;

use super::warning::{ParseWarning, WarningCode};
use super::VopmBank;
use crate::opm::{OpmSlotParam, OpmVoice};

const VOICE_MARKER: &str = "@:";
const COMMENT_MARKER: &str = "//";

/// Field-group tag at the start of a trimmed line, e.g. `M1:`.
const TAG_PATTERN: &str = r"^(\w{2,3}):";

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| Regex::new(TAG_PATTERN).expect("invalid regex pattern"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldGroup {
    Lfo,
    Channel,
    Operator(usize),
}

impl FieldGroup {
    const REQUIRED: [FieldGroup; 5] = [
        FieldGroup::Channel,
        FieldGroup::Operator(0),
        FieldGroup::Operator(1),
        FieldGroup::Operator(2),
        FieldGroup::Operator(3),
    ];

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "LFO" => Some(FieldGroup::Lfo),
            "CH" => Some(FieldGroup::Channel),
            "M1" => Some(FieldGroup::Operator(0)),
            "C1" => Some(FieldGroup::Operator(1)),
            "M2" => Some(FieldGroup::Operator(2)),
            "C2" => Some(FieldGroup::Operator(3)),
            _ => None,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            FieldGroup::Lfo => "LFO",
            FieldGroup::Channel => "CH",
            FieldGroup::Operator(0) => "M1",
            FieldGroup::Operator(1) => "C1",
            FieldGroup::Operator(2) => "M2",
            FieldGroup::Operator(_) => "C2",
        }
    }

    /// LFRQ AMD PMD WF NFRQ / PAN FL CON AMS PMS SLOT NE /
    /// AR D1R D2R RR D1L TL KS MUL DT1 DT2 AMS-EN
    fn field_count(&self) -> usize {
        match self {
            FieldGroup::Lfo => 5,
            FieldGroup::Channel => 7,
            FieldGroup::Operator(_) => 11,
        }
    }

    fn position(&self) -> usize {
        match self {
            FieldGroup::Lfo => 0,
            FieldGroup::Channel => 1,
            FieldGroup::Operator(i) => 2 + i,
        }
    }
}

#[derive(Debug, Clone)]
struct GroupLine {
    values: Vec<u8>,
    bad_token: Option<String>,
}

impl GroupLine {
    fn parse(rest: &str) -> Self {
        let mut values = Vec::new();
        let mut bad_token = None;
        for token in rest.split_whitespace() {
            match token.parse::<u8>() {
                Ok(value) => values.push(value),
                Err(_) => {
                    bad_token.get_or_insert_with(|| token.to_string());
                }
            }
        }
        Self { values, bad_token }
    }

    fn problem(&self, group: FieldGroup) -> Option<String> {
        if let Some(token) = &self.bad_token {
            return Some(format!("{}: '{}' is not a register value", group.tag(), token));
        }
        if self.values.len() != group.field_count() {
            return Some(format!(
                "{}: expected {} values, found {}",
                group.tag(),
                group.field_count(),
                self.values.len()
            ));
        }
        None
    }
}

#[derive(Debug)]
struct Block {
    index: u32,
    line: usize,
    groups: [Option<GroupLine>; 6],
    comments: Vec<String>,
}

impl Block {
    fn new(index: u32, line: usize) -> Self {
        Self {
            index,
            line,
            groups: Default::default(),
            comments: Vec::new(),
        }
    }

    fn group(&self, group: FieldGroup) -> Option<&GroupLine> {
        self.groups[group.position()].as_ref()
    }

    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if let Some(problem) = self
            .group(FieldGroup::Lfo)
            .and_then(|g| g.problem(FieldGroup::Lfo))
        {
            problems.push(problem);
        }
        for group in FieldGroup::REQUIRED {
            match self.group(group) {
                Some(line) => problems.extend(line.problem(group)),
                None => problems.push(format!("{}: missing", group.tag())),
            }
        }
        problems
    }

    /// Builds the voice. Only called once `problems()` is empty.
    fn build(&self) -> Option<OpmVoice> {
        let channel = &self.group(FieldGroup::Channel)?.values;
        let mut voice = OpmVoice {
            fb: channel[1],
            con: channel[2],
            ams: channel[3],
            pms: channel[4],
            ..Default::default()
        };
        for (i, slot) in voice.slots.iter_mut().enumerate() {
            let v = &self.group(FieldGroup::Operator(i))?.values;
            *slot = OpmSlotParam {
                ar: v[0],
                dr: v[1],
                sr: v[2],
                rr: v[3],
                sl: v[4],
                tl: v[5],
                ks: v[6],
                ml: v[7],
                dt1: v[8],
                dt2: v[9],
                am: v[10],
            };
        }
        Some(voice)
    }
}

enum State {
    /// Before the first voice marker.
    Preamble,
    /// Inside a block whose marker had no usable index.
    Skipping,
    Voice(Block),
}

struct Parser {
    bank: VopmBank,
    state: State,
}

impl Parser {
    fn new() -> Self {
        Self {
            bank: VopmBank::default(),
            state: State::Preamble,
        }
    }

    fn warn(&mut self, warning: ParseWarning) {
        log::warn!("{}", warning);
        self.bank.warnings.push(warning);
    }

    fn feed(&mut self, number: usize, line: &str) {
        if line.is_empty() {
            return;
        }
        if let Some(rest) = line.strip_prefix(VOICE_MARKER) {
            self.start_block(number, rest);
        } else if line.starts_with(COMMENT_MARKER) {
            if let State::Voice(block) = &mut self.state {
                block.comments.push(line.to_string());
            }
        } else {
            self.field_line(number, line);
        }
    }

    fn start_block(&mut self, number: usize, rest: &str) {
        self.finish_block();
        let token = rest.split_whitespace().next().unwrap_or("");
        match token.parse::<u32>() {
            Ok(index) => self.state = State::Voice(Block::new(index, number)),
            Err(_) => {
                self.state = State::Skipping;
                self.warn(ParseWarning::new(
                    WarningCode::InvalidVoiceIndex,
                    number,
                    format!("invalid voice index \"{}\", skipping block", token),
                ));
            }
        }
    }

    fn field_line(&mut self, number: usize, line: &str) {
        let tagged = tag_regex()
            .captures(line)
            .and_then(|c| Some((c.get(0)?.end(), c.get(1)?.as_str())));
        let group = tagged.and_then(|(_, tag)| FieldGroup::from_tag(tag));

        let (Some(group), Some((end, _))) = (group, tagged) else {
            let label = match tagged {
                Some((end, _)) => line[..end].to_string(),
                None => line.chars().take(3).collect(),
            };
            let voice = match &self.state {
                State::Voice(block) => Some(block.index),
                _ => None,
            };
            if matches!(self.state, State::Skipping) {
                return;
            }
            self.warn(ParseWarning {
                code: WarningCode::UnknownLineType,
                line: number,
                voice,
                message: format!("unexpected line type \"{}\"", label),
            });
            return;
        };

        let parsed = GroupLine::parse(&line[end..]);
        let warning = match &mut self.state {
            State::Skipping => None,
            State::Preamble => Some(ParseWarning::new(
                WarningCode::LineOutsideVoice,
                number,
                format!("{}: line before the first voice marker ignored", group.tag()),
            )),
            State::Voice(block) => {
                let slot = &mut block.groups[group.position()];
                let duplicate = slot.is_some();
                *slot = Some(parsed);
                duplicate.then(|| {
                    ParseWarning::for_voice(
                        WarningCode::DuplicateFieldGroup,
                        number,
                        block.index,
                        format!("{}: repeated field group replaces the earlier line", group.tag()),
                    )
                })
            }
        };
        if let Some(warning) = warning {
            self.warn(warning);
        }
    }

    fn finish_block(&mut self) {
        let State::Voice(block) = std::mem::replace(&mut self.state, State::Skipping) else {
            return;
        };
        let problems = block.problems();
        if !problems.is_empty() {
            self.warn(ParseWarning::for_voice(
                WarningCode::MalformedVoice,
                block.line,
                block.index,
                format!(
                    "@:{}: malformed OPM instrument skipped ({})",
                    block.index,
                    problems.join("; ")
                ),
            ));
            return;
        }
        let Some(voice) = block.build() else {
            return;
        };
        if self.bank.voices.insert(block.index, voice).is_some() {
            self.warn(ParseWarning::for_voice(
                WarningCode::DuplicateVoiceIndex,
                block.line,
                block.index,
                format!("@:{}: voice index declared again, earlier voice replaced", block.index),
            ));
        }
        self.bank.comments.insert(block.index, block.comments);
    }

    fn finish(mut self) -> VopmBank {
        self.finish_block();
        self.bank
    }
}

/// Parses VOPM text into a bank of OPM voices.
///
/// Never fails: malformed blocks are dropped and every problem is recorded in
/// [`VopmBank::warnings`] (and logged through `log::warn!`).
pub fn parse_vopm(text: &str) -> VopmBank {
    let mut parser = Parser::new();
    for (i, line) in text.lines().enumerate() {
        parser.feed(i + 1, line.trim());
    }
    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CH: &str = "CH:  64   3   4   1   2  15   0";
    const OP: &str = "18   1   2   6   4  35   1   2   6   0   0";

    fn block(index: &str) -> String {
        format!(
            "@:{} name\n{}\nM1: {}\nC1: {}\nM2: {}\nC2: {}\n",
            index, CH, OP, OP, OP, OP
        )
    }

    #[test]
    fn tag_regex_matches_short_prefixes() {
        let re = tag_regex();
        assert!(re.is_match("CH: 1"));
        assert!(re.is_match("LFO: 1"));
        assert!(!re.is_match("LFOX: 1"));
        assert!(!re.is_match(" M1: 1"));
    }

    #[test]
    fn empty_input_is_empty_bank() {
        let bank = parse_vopm("");
        assert!(bank.voices.is_empty());
        assert!(bank.comments.is_empty());
        assert!(bank.warnings.is_empty());
    }

    #[test]
    fn channel_fields_map_positionally() {
        let bank = parse_vopm(&block("0"));
        let voice = &bank.voices[&0];
        assert_eq!((voice.fb, voice.con, voice.ams, voice.pms), (3, 4, 1, 2));
        assert_eq!(voice.slots[3].dt1, 6);
        assert!(bank.warnings.is_empty());
    }

    #[test]
    fn crlf_line_endings() {
        let text = block("1").replace('\n', "\r\n");
        assert!(parse_vopm(&text).voices.contains_key(&1));
    }

    #[test]
    fn non_numeric_token_drops_voice() {
        let text = block("0").replace("M2: 18", "M2: x8");
        let bank = parse_vopm(&text);
        assert!(bank.voices.is_empty());
        assert_eq!(bank.warnings.len(), 1);
        assert!(bank.warnings[0].message.contains("'x8'"));
    }

    #[test]
    fn out_of_range_token_drops_voice() {
        let text = block("0").replace("M1: 18", "M1: 300");
        assert!(parse_vopm(&text).voices.is_empty());
    }

    #[test]
    fn missing_group_drops_voice() {
        let text = block("2").replace(CH, "");
        let bank = parse_vopm(&text);
        assert!(bank.voices.is_empty());
        assert_eq!(bank.warnings[0].code, WarningCode::MalformedVoice);
        assert_eq!(bank.warnings[0].voice, Some(2));
        assert_eq!(bank.warnings[0].line, 1);
    }

    #[test]
    fn invalid_marker_skips_block_silently_after_one_warning() {
        let text = format!("{}{}", block("x"), block("4"));
        let bank = parse_vopm(&text);
        assert_eq!(bank.voices.keys().copied().collect::<Vec<_>>(), vec![4]);
        assert_eq!(bank.warnings.len(), 1);
        assert_eq!(bank.warnings[0].code, WarningCode::InvalidVoiceIndex);
    }

    #[test]
    fn duplicate_group_replaces_and_warns() {
        let text = format!("{}M1: 31 0 0 0 0 0 0 0 0 0 0\n", block("0"));
        let bank = parse_vopm(&text);
        assert_eq!(bank.voices[&0].slots[0].ar, 31);
        assert_eq!(bank.warnings.len(), 1);
        assert_eq!(bank.warnings[0].code, WarningCode::DuplicateFieldGroup);
        assert_eq!(bank.warnings[0].line, 7);
    }

    #[test]
    fn group_before_marker_warns() {
        let text = format!("{}\n{}", CH, block("0"));
        let bank = parse_vopm(&text);
        assert_eq!(bank.warnings.len(), 1);
        assert_eq!(bank.warnings[0].code, WarningCode::LineOutsideVoice);
        assert_eq!(bank.warnings[0].line, 1);
        assert!(bank.voices.contains_key(&0));
    }

    #[test]
    fn unknown_tag_warns_with_line_number() {
        let text = format!("{}XYZ: 1 2 3\n", block("0"));
        let bank = parse_vopm(&text);
        assert!(bank.voices.contains_key(&0));
        assert_eq!(bank.warnings.len(), 1);
        assert_eq!(bank.warnings[0].code, WarningCode::UnknownLineType);
        assert_eq!(bank.warnings[0].line, 7);
        assert_eq!(bank.warnings[0].voice, Some(0));
        assert!(bank.warnings[0].message.contains("\"XYZ:\""));
    }

    #[test]
    fn repeated_voice_index_keeps_last() {
        let text = format!("{}{}", block("5"), block("5").replace("CH:  64   3", "CH:  64   6"));
        let bank = parse_vopm(&text);
        assert_eq!(bank.voices.len(), 1);
        assert_eq!(bank.voices[&5].fb, 6);
        assert_eq!(bank.warnings[0].code, WarningCode::DuplicateVoiceIndex);
    }
}
