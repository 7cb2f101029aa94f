use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::DatError;

/// A parsed No-Intro DAT file (Logiqx XML).
#[derive(Debug, Clone)]
pub struct DatFile {
    pub name: String,
    pub description: String,
    pub version: String,
    pub games: Vec<DatGame>,
}

/// A single game entry from a DAT file.
#[derive(Debug, Clone)]
pub struct DatGame {
    /// Display name, e.g. "Pokemon Platinum (USA) (En,Fr,De,Es,It)"
    pub name: String,
    /// No-Intro catalog id (the `id` attribute), if present
    pub id: Option<String>,
    pub roms: Vec<DatRom>,
}

/// A single ROM entry within a game.
#[derive(Debug, Clone)]
pub struct DatRom {
    pub name: String,
    pub size: u64,
    /// CRC32 checksum (lowercase hex)
    pub crc: String,
    /// MD5 checksum (lowercase hex), if present
    pub md5: Option<String>,
    /// SHA1 checksum (lowercase hex), if present
    pub sha1: Option<String>,
    /// SHA256 checksum (lowercase hex), if present
    pub sha256: Option<String>,
    /// Internal serial, if present
    pub serial: Option<String>,
}

/// Parse a Logiqx XML DAT from a reader.
pub fn parse_dat<R: BufRead>(reader: R) -> Result<DatFile, DatError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut dat = DatFile {
        name: String::new(),
        description: String::new(),
        version: String::new(),
        games: Vec::new(),
    };

    let mut in_header = false;
    let mut current_tag = String::new();
    let mut current_game: Option<DatGame> = None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag_name.as_str() {
                    "header" => in_header = true,
                    "game" | "machine" => current_game = Some(parse_game_attributes(e)?),
                    "rom" => push_rom(&mut current_game, e)?,
                    _ => current_tag = tag_name,
                }
            }
            Event::Empty(ref e) => {
                if e.name().as_ref() == b"rom" {
                    push_rom(&mut current_game, e)?;
                }
            }
            Event::Text(ref e) => {
                if in_header {
                    let text = e.unescape()?.to_string();
                    match current_tag.as_str() {
                        "name" => dat.name = text,
                        "description" => dat.description = text,
                        "version" => dat.version = text,
                        _ => {}
                    }
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"header" => in_header = false,
                b"game" | b"machine" => {
                    if let Some(game) = current_game.take() {
                        dat.games.push(game);
                    }
                }
                _ => current_tag.clear(),
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if dat.name.is_empty() && dat.games.is_empty() {
        return Err(DatError::invalid_dat(
            "No header or games found in XML DAT file",
        ));
    }

    Ok(dat)
}

/// Parse a DAT file from a file path.
pub fn parse_dat_file(path: &std::path::Path) -> Result<DatFile, DatError> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    parse_dat(reader)
}

fn parse_game_attributes(e: &BytesStart<'_>) -> Result<DatGame, DatError> {
    let mut game = DatGame {
        name: String::new(),
        id: None,
        roms: Vec::new(),
    };
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.to_string();
        match attr.key.as_ref() {
            b"name" => game.name = value,
            b"id" => game.id = Some(value),
            _ => {}
        }
    }
    Ok(game)
}

fn push_rom(game: &mut Option<DatGame>, e: &BytesStart<'_>) -> Result<(), DatError> {
    if let Some(game) = game {
        let rom = parse_rom_attributes(e)?;
        game.roms.push(rom);
    }
    Ok(())
}

fn parse_rom_attributes(e: &BytesStart<'_>) -> Result<DatRom, DatError> {
    let mut rom = DatRom {
        name: String::new(),
        size: 0,
        crc: String::new(),
        md5: None,
        sha1: None,
        sha256: None,
        serial: None,
    };

    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.to_string();
        match attr.key.as_ref() {
            b"name" => rom.name = value,
            b"size" => {
                rom.size = value
                    .parse()
                    .map_err(|_| DatError::invalid_dat(format!("Invalid ROM size: {value}")))?;
            }
            b"crc" => rom.crc = value.to_lowercase(),
            b"md5" => rom.md5 = Some(value.to_lowercase()),
            b"sha1" => rom.sha1 = Some(value.to_lowercase()),
            b"sha256" => rom.sha256 = Some(value.to_lowercase()),
            b"serial" => rom.serial = Some(value),
            _ => {}
        }
    }

    Ok(rom)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_XML_DAT: &str = r#"<?xml version="1.0"?>
<!DOCTYPE datafile PUBLIC "-//Logiqx//DTD ROM Management Datafile//EN" "http://www.logiqx.com/dats/datafile.dtd">
<datafile>
    <header>
        <name>Nintendo - Nintendo DS (Decrypted)</name>
        <description>Nintendo - Nintendo DS (Decrypted)</description>
        <version>20240101-000000</version>
    </header>
    <game name="Pokemon Platinum (USA) (En,Fr,De,Es,It)" id="3541">
        <description>Pokemon Platinum (USA) (En,Fr,De,Es,It)</description>
        <rom name="Pokemon Platinum (USA) (En,Fr,De,Es,It).nds" size="134217728" crc="9B2D1C2E" md5="AB" sha1="CE8D3A6E5F0A2F8C3A0A7B1C2D3E4F5A6B7C8D9E" serial="CPUE"/>
    </game>
    <game name="Mario &amp; Luigi - Partners in Time (Europe) (En,Fr,De,Es,It)" id="0123">
        <rom name="Mario &amp; Luigi - Partners in Time (Europe) (En,Fr,De,Es,It).nds" size="33554432" crc="0badf00d" sha1="0123456789abcdef0123456789abcdef01234567" sha256="AA" serial="ARME"/>
    </game>
</datafile>"#;

    #[test]
    fn test_parse_xml_dat() {
        let dat = parse_dat(SAMPLE_XML_DAT.as_bytes()).unwrap();
        assert_eq!(dat.name, "Nintendo - Nintendo DS (Decrypted)");
        assert_eq!(dat.version, "20240101-000000");
        assert_eq!(dat.games.len(), 2);

        let plat = &dat.games[0];
        assert_eq!(plat.name, "Pokemon Platinum (USA) (En,Fr,De,Es,It)");
        assert_eq!(plat.id.as_deref(), Some("3541"));
        assert_eq!(plat.roms[0].size, 134217728);
        assert_eq!(plat.roms[0].crc, "9b2d1c2e");
        assert_eq!(
            plat.roms[0].sha1.as_deref(),
            Some("ce8d3a6e5f0a2f8c3a0a7b1c2d3e4f5a6b7c8d9e")
        );
        assert_eq!(plat.roms[0].serial.as_deref(), Some("CPUE"));
    }

    #[test]
    fn test_attribute_entities_unescaped() {
        let dat = parse_dat(SAMPLE_XML_DAT.as_bytes()).unwrap();
        let ml = &dat.games[1];
        assert_eq!(
            ml.name,
            "Mario & Luigi - Partners in Time (Europe) (En,Fr,De,Es,It)"
        );
        assert_eq!(ml.roms[0].sha256.as_deref(), Some("aa"));
    }

    #[test]
    fn test_parse_empty_xml() {
        let xml = r#"<?xml version="1.0"?><datafile></datafile>"#;
        assert!(parse_dat(xml.as_bytes()).is_err());
    }

    #[test]
    fn test_invalid_size_rejected() {
        let xml = r#"<datafile><game name="X (USA)"><rom name="x.nds" size="big" crc="00000000"/></game></datafile>"#;
        let err = parse_dat(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, DatError::InvalidDat(_)));
    }

    #[test]
    fn test_game_without_id() {
        let xml = r#"<datafile><game name="Homebrew (World)"><rom name="h.nds" size="16" crc="1"/></game></datafile>"#;
        let dat = parse_dat(xml.as_bytes()).unwrap();
        assert_eq!(dat.games[0].id, None);
        assert_eq!(dat.games[0].roms[0].sha1, None);
    }
}
