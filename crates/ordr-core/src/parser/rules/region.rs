//! Korean region keywords that open an address block.

/// Province / metropolitan-city name fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Seoul,
    Busan,
    Daegu,
    Incheon,
    Gwangju,
    Daejeon,
    Ulsan,
    Sejong,
    Gyeonggi,
    Gangwon,
    Chungbuk,
    Chungnam,
    Jeonbuk,
    Jeonnam,
    Gyeongbuk,
    Gyeongnam,
    Jeju,
    SpecialCity,
    MetropolitanCity,
    SpecialAutonomous,
    ChungcheongbukDo,
    ChungcheongnamDo,
    JeollabukDo,
    JeollanamDo,
    GyeongsangbukDo,
    GyeongsangnamDo,
    GangwonDo,
    GyeonggiDo,
    JejuDo,
}

impl Region {
    pub const ALL: [Region; 29] = [
        Region::Seoul,
        Region::Busan,
        Region::Daegu,
        Region::Incheon,
        Region::Gwangju,
        Region::Daejeon,
        Region::Ulsan,
        Region::Sejong,
        Region::Gyeonggi,
        Region::Gangwon,
        Region::Chungbuk,
        Region::Chungnam,
        Region::Jeonbuk,
        Region::Jeonnam,
        Region::Gyeongbuk,
        Region::Gyeongnam,
        Region::Jeju,
        Region::SpecialCity,
        Region::MetropolitanCity,
        Region::SpecialAutonomous,
        Region::ChungcheongbukDo,
        Region::ChungcheongnamDo,
        Region::JeollabukDo,
        Region::JeollanamDo,
        Region::GyeongsangbukDo,
        Region::GyeongsangnamDo,
        Region::GangwonDo,
        Region::GyeonggiDo,
        Region::JejuDo,
    ];

    /// The fragment matched against text.
    pub fn keyword(&self) -> &'static str {
        match self {
            Region::Seoul => "서울",
            Region::Busan => "부산",
            Region::Daegu => "대구",
            Region::Incheon => "인천",
            Region::Gwangju => "광주",
            Region::Daejeon => "대전",
            Region::Ulsan => "울산",
            Region::Sejong => "세종",
            Region::Gyeonggi => "경기",
            Region::Gangwon => "강원",
            Region::Chungbuk => "충북",
            Region::Chungnam => "충남",
            Region::Jeonbuk => "전북",
            Region::Jeonnam => "전남",
            Region::Gyeongbuk => "경북",
            Region::Gyeongnam => "경남",
            Region::Jeju => "제주",
            Region::SpecialCity => "특별시",
            Region::MetropolitanCity => "광역시",
            Region::SpecialAutonomous => "특별자치",
            Region::ChungcheongbukDo => "충청북도",
            Region::ChungcheongnamDo => "충청남도",
            Region::JeollabukDo => "전라북도",
            Region::JeollanamDo => "전라남도",
            Region::GyeongsangbukDo => "경상북도",
            Region::GyeongsangnamDo => "경상남도",
            Region::GangwonDo => "강원도",
            Region::GyeonggiDo => "경기도",
            Region::JejuDo => "제주도",
        }
    }

    /// First region whose keyword occurs in `text`.
    pub fn find_in(text: &str) -> Option<Region> {
        Self::ALL.into_iter().find(|r| text.contains(r.keyword()))
    }
}

/// Whether `text` mentions any region keyword.
pub fn contains_region_keyword(text: &str) -> bool {
    Region::find_in(text).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_region_keyword() {
        assert!(contains_region_keyword("서울특별시 강남구"));
        assert!(contains_region_keyword("경기 평택시"));
        assert!(contains_region_keyword("전북특별자치도 김제시"));
        assert!(!contains_region_keyword("대송4길 80"));
        assert!(!contains_region_keyword("John Smith"));
    }

    #[test]
    fn test_find_in() {
        assert_eq!(Region::find_in("부산광역시 해운대구"), Some(Region::Busan));
        assert_eq!(Region::find_in("김제시 신전로"), None);
    }
}
