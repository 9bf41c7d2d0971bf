use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::models::LocationData;

/// Coarse buckets used by the monitoring board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    North,
    Northeast,
    Central,
    South,
    Bangkok,
}

// Checked top to bottom. The northeast terms contain the north term, so they
// must come first.
const THAI_RULES: [(Region, &[&str]); 5] = [
    (Region::Bangkok, &["กรุงเทพ"]),
    (Region::Northeast, &["ตะวันออกเฉียงเหนือ", "อีสาน"]),
    (Region::North, &["เหนือ"]),
    (Region::South, &["ใต้"]),
    (Region::Central, &["กลาง", "ตะวันตก", "ตะวันออก"]),
];

const LATIN_RULES: [(Region, &[&str]); 5] = [
    (Region::Bangkok, &["bangkok"]),
    (Region::Northeast, &["northeast", "north-east", "north east", "isan", "isaan"]),
    (Region::North, &["north"]),
    (Region::South, &["south"]),
    (Region::Central, &["central", "east", "west"]),
];

const NORTH: &[&str] = &[
    "เชียงราย", "เชียงใหม่", "น่าน", "พะเยา", "แพร่", "แม่ฮ่องสอน", "ลำปาง", "ลำพูน", "อุตรดิตถ์",
    "กำแพงเพชร", "ตาก", "นครสวรรค์", "พิจิตร", "พิษณุโลก", "เพชรบูรณ์", "สุโขทัย", "อุทัยธานี",
];

const NORTHEAST: &[&str] = &[
    "กาฬสินธุ์", "ขอนแก่น", "ชัยภูมิ", "นครพนม", "นครราชสีมา", "บึงกาฬ", "บุรีรัมย์", "มหาสารคาม",
    "มุกดาหาร", "ยโสธร", "ร้อยเอ็ด", "เลย", "ศรีสะเกษ", "สกลนคร", "สุรินทร์", "หนองคาย",
    "หนองบัวลำภู", "อำนาจเจริญ", "อุดรธานี", "อุบลราชธานี",
];

const SOUTH: &[&str] = &[
    "กระบี่", "ชุมพร", "ตรัง", "นครศรีธรรมราช", "นราธิวาส", "ปัตตานี", "พังงา", "พัทลุง", "ภูเก็ต",
    "ยะลา", "ระนอง", "สงขลา", "สตูล", "สุราษฎร์ธานี",
];

const BANGKOK_METRO: &[&str] = &[
    "กรุงเทพมหานคร", "นนทบุรี", "ปทุมธานี", "สมุทรปราการ", "สมุทรสาคร", "นครปฐม",
];

const CENTRAL: &[&str] = &[
    "กาญจนบุรี", "จันทบุรี", "ฉะเชิงเทรา", "ชลบุรี", "ชัยนาท", "ตราด", "นครนายก", "ปราจีนบุรี",
    "ประจวบคีรีขันธ์", "พระนครศรีอยุธยา", "เพชรบุรี", "ระยอง", "ราชบุรี", "ลพบุรี", "สมุทรสงคราม",
    "สระแก้ว", "สระบุรี", "สิงห์บุรี", "สุพรรณบุรี", "อ่างทอง",
];

lazy_static! {
    static ref PROVINCES: HashMap<&'static str, Region> = {
        let mut m = HashMap::new();
        for (region, names) in [
            (Region::North, NORTH),
            (Region::Northeast, NORTHEAST),
            (Region::South, SOUTH),
            (Region::Bangkok, BANGKOK_METRO),
            (Region::Central, CENTRAL),
        ] {
            for name in names {
                m.insert(*name, region);
            }
        }
        m
    };
}

impl Region {
    /// Buckets free-form region text such as "ภาคตะวันออกเฉียงเหนือ".
    pub fn classify(text: &str) -> Option<Region> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Some(region) = first_match(&THAI_RULES, text) {
            return Some(region);
        }
        first_match(&LATIN_RULES, &text.to_lowercase())
    }

    pub fn of_province(province: &str) -> Option<Region> {
        let province = province.trim();
        let province = match province {
            "กรุงเทพฯ" | "กรุงเทพ" | "Bangkok" => "กรุงเทพมหานคร",
            other => other,
        };
        PROVINCES.get(province).copied()
    }

    /// Region text wins; the province table covers records without one.
    pub fn of_location(location: &LocationData) -> Option<Region> {
        location
            .region
            .as_deref()
            .and_then(Region::classify)
            .or_else(|| Region::of_province(&location.province))
    }

    pub fn id(self) -> &'static str {
        match self {
            Region::North => "north",
            Region::Northeast => "northeast",
            Region::Central => "central",
            Region::South => "south",
            Region::Bangkok => "bangkok",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Region::North => "ภาคเหนือ",
            Region::Northeast => "ภาคอีสาน",
            Region::Central => "ภาคกลาง",
            Region::South => "ภาคใต้",
            Region::Bangkok => "กรุงเทพฯ และปริมณฑล",
        }
    }
}

fn first_match(rules: &[(Region, &[&str])], text: &str) -> Option<Region> {
    rules
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| text.contains(needle)))
        .map(|(region, _)| *region)
}

/// Region selector on the monitoring board; `all` means no filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionFilter {
    #[default]
    All,
    Only(Region),
}

impl RegionFilter {
    pub fn matches(self, location: &LocationData) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only(region) => Region::of_location(location) == Some(region),
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            RegionFilter::All => "all",
            RegionFilter::Only(region) => region.id(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RegionFilter::All => "ทั่วประเทศ",
            RegionFilter::Only(region) => region.label(),
        }
    }
}

impl FromStr for RegionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(RegionFilter::All),
            "north" => Ok(RegionFilter::Only(Region::North)),
            "northeast" => Ok(RegionFilter::Only(Region::Northeast)),
            "central" => Ok(RegionFilter::Only(Region::Central)),
            "south" => Ok(RegionFilter::Only(Region::South)),
            "bangkok" => Ok(RegionFilter::Only(Region::Bangkok)),
            other => Err(format!("Unknown region: {}", other)),
        }
    }
}
