//! tags.rs
//! Well-known tag ids and the static name table used by the format engine.
//!
//! The codec itself only cares about the header-private tags (regions and the
//! i18n table) and the two historical special cases; the remaining ids are
//! the common package tags shipped as default configuration data.

use crate::index::types::TagType;

/// Tag id as stored on the wire.
pub type Tag = i32;

// Header-private tags.
pub const HEADER_IMAGE: Tag      = 61;
pub const HEADER_SIGNATURES: Tag = 62;
pub const HEADER_IMMUTABLE: Tag  = 63;
pub const HEADER_REGIONS: Tag    = 64;
pub const HEADER_I18NTABLE: Tag  = 100;

// Package tags.
pub const NAME: Tag          = 1000;
pub const VERSION: Tag       = 1001;
pub const RELEASE: Tag       = 1002;
pub const EPOCH: Tag         = 1003;
pub const SUMMARY: Tag       = 1004;
pub const DESCRIPTION: Tag   = 1005;
pub const BUILDTIME: Tag     = 1006;
pub const BUILDHOST: Tag     = 1007;
pub const SIZE: Tag          = 1009;
pub const VENDOR: Tag        = 1011;
pub const LICENSE: Tag       = 1014;
pub const PACKAGER: Tag      = 1015;
pub const GROUP: Tag         = 1016;
pub const URL: Tag           = 1020;
pub const OS: Tag            = 1021;
pub const ARCH: Tag          = 1022;
pub const OLDFILENAMES: Tag  = 1027;
pub const FILESIZES: Tag     = 1028;
pub const FILEMODES: Tag     = 1030;
pub const FILEMTIMES: Tag    = 1034;
pub const FILEMD5S: Tag      = 1035;
pub const FILEFLAGS: Tag     = 1037;
pub const FILEUSERNAME: Tag  = 1039;
pub const FILEGROUPNAME: Tag = 1040;
pub const SOURCERPM: Tag     = 1044;
pub const PROVIDENAME: Tag   = 1047;
pub const REQUIRENAME: Tag   = 1049;
pub const VERIFYSCRIPT: Tag  = 1079;
pub const CHANGELOGTIME: Tag = 1080;
pub const CHANGELOGNAME: Tag = 1081;
pub const CHANGELOGTEXT: Tag = 1082;
pub const DIRINDEXES: Tag    = 1116;
pub const BASENAMES: Tag     = 1117;
pub const DIRNAMES: Tag      = 1118;
pub const PAYLOADFORMAT: Tag = 1124;

/// Is `tag` one of the region marker tags (image, signatures, immutable)?
#[inline]
pub const fn is_region_tag(tag: Tag) -> bool {
    tag >= HEADER_IMAGE && tag < HEADER_REGIONS
}

/// A historical misassigned tag: early builds wrote the verify script as tag
/// 15. Applied only to the first descriptor of a decoded image.
#[derive(Debug, Clone, Copy)]
pub struct TagCorrection {
    pub from: Tag,
    pub ty: TagType,
    pub count: u32,
    pub to: Tag,
}

pub const TAG_CORRECTIONS: &[TagCorrection] = &[
    TagCorrection { from: 15, ty: TagType::String, count: 1, to: VERIFYSCRIPT },
];

/// Replacing the first tag through a dribble also drops the second one.
pub const DRIBBLE_ALIASES: &[(Tag, Tag)] = &[
    (BASENAMES, OLDFILENAMES),
];

/// Prefix accepted (and ignored) in front of tag names in templates.
pub const TAG_NAME_PREFIX: &str = "RPMTAG_";

const BUILTIN_TAGS: &[(&str, Tag)] = &[
    ("HEADERIMAGE", HEADER_IMAGE),
    ("HEADERSIGNATURES", HEADER_SIGNATURES),
    ("HEADERIMMUTABLE", HEADER_IMMUTABLE),
    ("HEADERREGIONS", HEADER_REGIONS),
    ("HEADERI18NTABLE", HEADER_I18NTABLE),
    ("NAME", NAME),
    ("VERSION", VERSION),
    ("RELEASE", RELEASE),
    ("EPOCH", EPOCH),
    ("SUMMARY", SUMMARY),
    ("DESCRIPTION", DESCRIPTION),
    ("BUILDTIME", BUILDTIME),
    ("BUILDHOST", BUILDHOST),
    ("SIZE", SIZE),
    ("VENDOR", VENDOR),
    ("LICENSE", LICENSE),
    ("PACKAGER", PACKAGER),
    ("GROUP", GROUP),
    ("URL", URL),
    ("OS", OS),
    ("ARCH", ARCH),
    ("OLDFILENAMES", OLDFILENAMES),
    ("FILESIZES", FILESIZES),
    ("FILEMODES", FILEMODES),
    ("FILEMTIMES", FILEMTIMES),
    ("FILEMD5S", FILEMD5S),
    ("FILEFLAGS", FILEFLAGS),
    ("FILEUSERNAME", FILEUSERNAME),
    ("FILEGROUPNAME", FILEGROUPNAME),
    ("SOURCERPM", SOURCERPM),
    ("PROVIDENAME", PROVIDENAME),
    ("REQUIRENAME", REQUIRENAME),
    ("VERIFYSCRIPT", VERIFYSCRIPT),
    ("CHANGELOGTIME", CHANGELOGTIME),
    ("CHANGELOGNAME", CHANGELOGNAME),
    ("CHANGELOGTEXT", CHANGELOGTEXT),
    ("DIRINDEXES", DIRINDEXES),
    ("BASENAMES", BASENAMES),
    ("DIRNAMES", DIRNAMES),
    ("PAYLOADFORMAT", PAYLOADFORMAT),
];

/// Static tag-name table: name -> id, matched case-insensitively.
#[derive(Debug, Clone)]
pub struct TagTable {
    entries: Vec<(String, Tag)>,
}

impl Default for TagTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TagTable {
    /// Table of the well-known package tags.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_TAGS.iter().map(|&(n, t)| (n, t)))
    }

    pub fn new<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Tag)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(n, t)| (strip_tag_prefix(n).to_string(), t))
                .collect(),
        }
    }

    /// Resolve a template name; an optional `RPMTAG_` prefix is ignored.
    pub fn lookup(&self, name: &str) -> Option<Tag> {
        let name = strip_tag_prefix(name);
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, t)| t)
    }

    pub fn name_of(&self, tag: Tag) -> Option<&str> {
        self.entries.iter().find(|&&(_, t)| t == tag).map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Drop a leading `RPMTAG_` (any case) from a tag or extension name.
pub(crate) fn strip_tag_prefix(name: &str) -> &str {
    let p = TAG_NAME_PREFIX.len();
    if name.len() >= p
        && name.is_char_boundary(p)
        && name[..p].eq_ignore_ascii_case(TAG_NAME_PREFIX)
    {
        &name[p..]
    } else {
        name
    }
}
