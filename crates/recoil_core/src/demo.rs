use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::Context;
use hashbrown::HashMap;

use crate::bitbuf::BitBuf;
use crate::demofile::{self, FrameReader};
use crate::parser::Parser;
use crate::schema::GameProtocol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameType {
    FreeForAll,
    Duel,
    TeamDeathmatch,
    CaptureTheFlag,
}

impl GameType {
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            0 => Some(Self::FreeForAll),
            1 => Some(Self::Duel),
            3 => Some(Self::TeamDeathmatch),
            4 => Some(Self::CaptureTheFlag),
            _ => None,
        }
    }
}

/// one roster value: the client's name first, numeric stats appended as score
/// commands arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreField {
    Text(String),
    Num(i64),
}

/// everything one parse accumulates about a demo. created at parse start,
/// mutated by the parser as game-state/command messages are read, finalized
/// once after the last message by applying the single retained score command.
#[derive(Debug, Default)]
pub struct Demo {
    pub protocol: Option<i32>,
    pub mod_name: Option<String>,
    pub date: Option<String>,
    pub host_name: Option<String>,
    pub map: Option<String>,
    pub game_type: Option<GameType>,
    /// client slot -> ordered score fields
    pub clients: HashMap<i64, Vec<ScoreField>>,
    /// resolved protocol + mod; selection comes from the server-info config
    /// string inside the first game-state message, never from the file name
    pub game_protocol: Option<&'static GameProtocol>,
}

impl Demo {
    pub fn new() -> Self {
        Self::default()
    }

    /// parses a demo without producing output.
    pub fn parse<R: Read>(rdr: R) -> anyhow::Result<Self> {
        let mut demo = Self::new();
        demo.read_messages(rdr, None)?;
        Ok(demo)
    }

    /// parses a demo and writes the converted rendition to `out`. unconverted
    /// fields round-trip byte for byte.
    pub fn convert<R: Read, W: Write>(rdr: R, out: &mut W) -> anyhow::Result<Self> {
        let mut demo = Self::new();
        demo.read_messages(rdr, Some(out as &mut dyn Write))?;
        Ok(demo)
    }

    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("demo {}", path.display()))?;
        Self::parse(BufReader::new(file)).with_context(|| format!("demo {}", path.display()))
    }

    pub fn convert_file<P: AsRef<Path>>(input: P, output: P) -> anyhow::Result<Self> {
        let input = input.as_ref();
        let output = output.as_ref();
        let in_file = File::open(input).with_context(|| format!("demo {}", input.display()))?;
        let out_file =
            File::create(output).with_context(|| format!("output {}", output.display()))?;
        let mut out = BufWriter::new(out_file);
        Self::convert(BufReader::new(in_file), &mut out)
            .with_context(|| format!("demo {}", input.display()))
    }

    fn read_messages<R: Read>(
        &mut self,
        rdr: R,
        mut out: Option<&mut dyn Write>,
    ) -> anyhow::Result<()> {
        let convert = out.is_some();
        let mut frames = FrameReader::new(rdr);
        let mut parser = Parser::new(self, convert);

        let mut last_scores: Option<String> = None;
        while let Some(frame) = frames.read_frame()? {
            let mut msg = BitBuf::from_bytes(&frame.data);
            let parsed = parser.parse_message(&mut msg)?;
            if parsed.score_command.is_some() {
                last_scores = parsed.score_command;
            }

            if let Some(out) = out.as_deref_mut() {
                demofile::write_frame(out, frame.seq, &msg.to_bytes())?;
            }
        }

        if let Some(scores) = last_scores {
            parser.parse_scores(&scores);
        }

        Ok(())
    }
}
