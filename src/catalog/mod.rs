use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::Policy;

/// Icons the front end knows how to draw. Anything else falls back to
/// `HelpCircle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Glyph {
    Wallet,
    HeartPulse,
    GraduationCap,
    Bus,
    Leaf,
    Wind,
    Scale,
    ShieldCheck,
    Wheat,
    Briefcase,
    Home,
    Wifi,
    Droplets,
    Baby,
    Accessibility,
    Landmark,
    Factory,
    Plane,
    Zap,
    Users,
    HelpCircle,
}

lazy_static! {
    static ref GLYPHS: HashMap<&'static str, Glyph> = {
        let mut m = HashMap::new();
        m.insert("Wallet", Glyph::Wallet);
        m.insert("HeartPulse", Glyph::HeartPulse);
        m.insert("GraduationCap", Glyph::GraduationCap);
        m.insert("Bus", Glyph::Bus);
        m.insert("Leaf", Glyph::Leaf);
        m.insert("Wind", Glyph::Wind);
        m.insert("Scale", Glyph::Scale);
        m.insert("ShieldCheck", Glyph::ShieldCheck);
        m.insert("Wheat", Glyph::Wheat);
        m.insert("Briefcase", Glyph::Briefcase);
        m.insert("Home", Glyph::Home);
        m.insert("Wifi", Glyph::Wifi);
        m.insert("Droplets", Glyph::Droplets);
        m.insert("Baby", Glyph::Baby);
        m.insert("Accessibility", Glyph::Accessibility);
        m.insert("Landmark", Glyph::Landmark);
        m.insert("Factory", Glyph::Factory);
        m.insert("Plane", Glyph::Plane);
        m.insert("Zap", Glyph::Zap);
        m.insert("Users", Glyph::Users);
        m.insert("HelpCircle", Glyph::HelpCircle);
        m
    };

    static ref BUILTIN: Vec<Policy> = POLICY_TABLE
        .iter()
        .map(|(id, title, description, focus, icon_name, examples)| Policy {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            focus: focus.to_string(),
            icon_name: icon_name.to_string(),
            examples: (!examples.is_empty()).then(|| examples.to_string()),
        })
        .collect();
}

impl Glyph {
    pub fn resolve(name: &str) -> Glyph {
        GLYPHS.get(name).copied().unwrap_or(Glyph::HelpCircle)
    }
}

// id, title, description, focus, icon, examples
const POLICY_TABLE: [(&str, &str, &str, &str, &str, &str); 20] = [
    (
        "cost-of-living",
        "ค่าครองชีพและปากท้อง",
        "ลดภาระค่าใช้จ่ายในชีวิตประจำวัน ควบคุมราคาสินค้าจำเป็น",
        "เศรษฐกิจ",
        "Wallet",
        "ตรึงราคาก๊าซหุงต้ม ลดค่าไฟฟ้า ร้านธงฟ้าในชุมชน",
    ),
    (
        "public-health",
        "ระบบสาธารณสุขถ้วนหน้า",
        "ยกระดับบริการโรงพยาบาลรัฐ ลดเวลารอคิว เพิ่มบุคลากรการแพทย์",
        "สุขภาพ",
        "HeartPulse",
        "รักษาได้ทุกที่ด้วยบัตรประชาชน หมอประจำครอบครัว",
    ),
    (
        "education",
        "การศึกษาที่เท่าเทียม",
        "ลดความเหลื่อมล้ำทางการศึกษา พัฒนาโรงเรียนในทุกพื้นที่",
        "การศึกษา",
        "GraduationCap",
        "เรียนฟรีถึงปริญญาตรี ทุนสำหรับเด็กชนบท",
    ),
    (
        "public-transport",
        "ขนส่งสาธารณะราคาถูก",
        "ขยายเครือข่ายรถเมล์และรถไฟ ลดค่าโดยสาร",
        "คมนาคม",
        "Bus",
        "ตั๋วร่วมทุกระบบ รถเมล์ไฟฟ้าในต่างจังหวัด",
    ),
    (
        "clean-air",
        "แก้ปัญหาฝุ่น PM2.5",
        "ลดการเผาในที่โล่งและมลพิษจากการจราจรและอุตสาหกรรม",
        "สิ่งแวดล้อม",
        "Wind",
        "ระบบแจ้งเตือนคุณภาพอากาศ มาตรการจูงใจเลิกเผา",
    ),
    (
        "environment",
        "สิ่งแวดล้อมและพื้นที่สีเขียว",
        "เพิ่มพื้นที่สีเขียว ดูแลป่าและทะเล จัดการขยะอย่างยั่งยืน",
        "สิ่งแวดล้อม",
        "Leaf",
        "สวนสาธารณะใกล้บ้าน แยกขยะที่ต้นทาง",
    ),
    (
        "anti-corruption",
        "ปราบปรามการทุจริต",
        "เปิดเผยข้อมูลภาครัฐ ตรวจสอบงบประมาณได้ทุกขั้นตอน",
        "ธรรมาภิบาล",
        "Scale",
        "ระบบจัดซื้อจัดจ้างโปร่งใส คุ้มครองผู้แจ้งเบาะแส",
    ),
    (
        "public-safety",
        "ความปลอดภัยในชีวิตและทรัพย์สิน",
        "ลดอาชญากรรม ปราบยาเสพติด และเพิ่มความปลอดภัยบนท้องถนน",
        "ความปลอดภัย",
        "ShieldCheck",
        "ไฟส่องสว่างทุกซอย กล้องวงจรปิดในชุมชน",
    ),
    (
        "agriculture",
        "ราคาพืชผลและเกษตรกร",
        "ประกันรายได้เกษตรกร พัฒนาแหล่งน้ำและตลาดสินค้าเกษตร",
        "เกษตรกรรม",
        "Wheat",
        "ประกันราคาข้าว ยางพารา และมันสำปะหลัง",
    ),
    (
        "jobs",
        "การจ้างงานและค่าแรง",
        "สร้างงานในท้องถิ่น ปรับค่าแรงให้เหมาะสมกับค่าครองชีพ",
        "แรงงาน",
        "Briefcase",
        "ค่าแรงขั้นต่ำที่เป็นธรรม ฝึกทักษะอาชีพใหม่",
    ),
    (
        "housing",
        "ที่อยู่อาศัยราคาเข้าถึงได้",
        "เพิ่มบ้านเช่าและบ้านมั่นคงสำหรับคนรายได้น้อยและคนรุ่นใหม่",
        "ที่อยู่อาศัย",
        "Home",
        "บ้านเช่าราคาถูกใกล้ระบบขนส่ง สินเชื่อบ้านหลังแรก",
    ),
    (
        "digital-access",
        "อินเทอร์เน็ตและบริการรัฐดิจิทัล",
        "อินเทอร์เน็ตความเร็วสูงทั่วถึง ติดต่อราชการได้ออนไลน์",
        "ดิจิทัล",
        "Wifi",
        "Wi-Fi ฟรีในชุมชน ยื่นเอกสารราชการผ่านแอป",
    ),
    (
        "water-management",
        "บริหารจัดการน้ำ ท่วม แล้ง",
        "ป้องกันน้ำท่วมและภัยแล้ง พัฒนาระบบชลประทาน",
        "ทรัพยากรน้ำ",
        "Droplets",
        "ขุดลอกคูคลอง แก้มลิงประจำตำบล",
    ),
    (
        "childcare",
        "เด็กเล็กและครอบครัว",
        "สนับสนุนการเลี้ยงดูเด็กเล็ก ศูนย์เด็กเล็กคุณภาพ",
        "ครอบครัว",
        "Baby",
        "เงินอุดหนุนเด็กแรกเกิดถ้วนหน้า ศูนย์เด็กเล็กใกล้ที่ทำงาน",
    ),
    (
        "elderly-welfare",
        "สวัสดิการผู้สูงอายุและผู้พิการ",
        "เพิ่มเบี้ยยังชีพ และบริการดูแลระยะยาวในชุมชน",
        "สวัสดิการ",
        "Accessibility",
        "บำนาญประชาชน ผู้ดูแลผู้สูงอายุที่บ้าน",
    ),
    (
        "decentralization",
        "กระจายอำนาจสู่ท้องถิ่น",
        "ให้ท้องถิ่นมีงบประมาณและอำนาจตัดสินใจมากขึ้น",
        "การเมือง",
        "Landmark",
        "เลือกตั้งผู้ว่าราชการจังหวัด งบประมาณตามความต้องการของชุมชน",
    ),
    (
        "sme-support",
        "ธุรกิจรายย่อยและ SME",
        "เข้าถึงแหล่งทุนง่ายขึ้น ลดขั้นตอนการขออนุญาต",
        "เศรษฐกิจ",
        "Factory",
        "สินเชื่อดอกเบี้ยต่ำ ลดภาษีสำหรับกิจการเปิดใหม่",
    ),
    (
        "tourism",
        "การท่องเที่ยวและเศรษฐกิจท้องถิ่น",
        "ส่งเสริมการท่องเที่ยวชุมชน กระจายรายได้สู่เมืองรอง",
        "ท่องเที่ยว",
        "Plane",
        "",
    ),
    (
        "energy",
        "พลังงานสะอาดและค่าไฟ",
        "ปรับโครงสร้างค่าไฟฟ้า ส่งเสริมโซลาร์เซลล์ในครัวเรือน",
        "พลังงาน",
        "Zap",
        "ขายไฟฟ้าคืนระบบได้ ลดค่าไฟฐาน",
    ),
    (
        "civic-participation",
        "การมีส่วนร่วมของประชาชน",
        "เปิดพื้นที่ให้ประชาชนเสนอและติดตามนโยบาย",
        "ประชาธิปไตย",
        "Users",
        "",
    ),
];

/// Ordered, read-only policy list.
#[derive(Debug, Clone)]
pub struct Catalog {
    policies: Vec<Policy>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            policies: BUILTIN.clone(),
        }
    }

    #[cfg(test)]
    pub fn from_policies(policies: Vec<Policy>) -> Self {
        Self { policies }
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    pub fn find(&self, id: &str) -> Option<&Policy> {
        self.policies.iter().find(|policy| policy.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}
