//! Proximity search over a realistic slice of central Seoul facilities

use std::collections::HashSet;

use er_finder::{FacilityTable, ReferencePoint, distance_km, filter_and_rank, group_counts_by_category};

const SEOUL_CSV: &str = "\
기관명,주소,병원분류명,병원위도,병원경도,대표전화1,응급실전화,응급실운영여부
서울대학교병원,서울특별시 종로구 대학로 101,상급종합,37.5796,126.9990,1588-5700,02-2072-2473,1
강북삼성병원,서울특별시 종로구 새문안로 29,종합,37.5684,126.9679,1599-8114,02-2001-1000,1
국립중앙의료원,서울특별시 중구 을지로 245,종합,37.5670,127.0055,02-2260-7114,02-2262-4695,1
적십자병원,서울특별시 종로구 새문안로 9,종합,37.5670,126.9670,02-2002-8000,02-2002-8888,1
중앙대학교병원,서울특별시 동작구 흑석로 102,상급종합,37.5070,126.9610,1800-1114,02-6299-1339,1
폐업한의원,서울특별시 중구 세종대로 1,의원,37.5660,126.9770,02-000-0000,,2
";

fn seoul() -> FacilityTable {
    FacilityTable::from_csv_str(SEOUL_CSV).unwrap()
}

fn city_hall() -> ReferencePoint {
    ReferencePoint::new(37.5665, 126.9780)
}

fn all(table: &FacilityTable) -> HashSet<String> {
    table.categories().into_iter().collect()
}

#[test]
fn test_closed_facilities_are_not_loaded() {
    let table = seoul();
    assert_eq!(table.len(), 5);
    assert!(table.records().iter().all(|r| r.name != "폐업한의원"));
    assert_eq!(table.categories(), vec!["상급종합", "종합"]);
}

#[test]
fn test_five_km_around_city_hall() {
    let table = seoul();
    let result = filter_and_rank(table.records(), &city_hall(), 5.0, &all(&table));

    let filtered: Vec<&str> = result.filtered.iter().map(|r| r.facility.name.as_str()).collect();
    assert_eq!(
        filtered,
        vec!["서울대학교병원", "강북삼성병원", "국립중앙의료원", "적십자병원"]
    );

    let nearest: Vec<&str> = result.nearest.iter().map(|r| r.facility.name.as_str()).collect();
    assert_eq!(nearest, vec!["강북삼성병원", "적십자병원", "서울대학교병원"]);
    assert!(
        result
            .nearest
            .windows(2)
            .all(|pair| pair[0].distance_km <= pair[1].distance_km)
    );
}

#[test]
fn test_category_filter_with_counts() {
    let table = seoul();
    let allowed: HashSet<String> = ["상급종합".to_string()].into();
    let result = filter_and_rank(table.records(), &city_hall(), 20.0, &allowed);

    assert_eq!(result.filtered.len(), 2);
    let counts = group_counts_by_category(&result.filtered);
    assert_eq!(counts.get("상급종합"), Some(&2));
    assert_eq!(counts.get("종합"), None);
}

#[test]
fn test_distances_are_annotated_from_reference() {
    let table = seoul();
    let reference = city_hall();
    let result = filter_and_rank(table.records(), &reference, 20.0, &all(&table));

    for ranked in &result.filtered {
        let expected = distance_km(&reference, &ranked.facility.location());
        assert_eq!(ranked.distance_km, expected);
        assert_eq!(ranked.distance_km, distance_km(&ranked.facility.location(), &reference));
    }
}

#[test]
fn test_zero_radius_away_from_every_facility() {
    let table = seoul();
    let result = filter_and_rank(table.records(), &city_hall(), 0.0, &all(&table));
    assert!(result.filtered.is_empty());
    assert!(result.nearest.is_empty());
}

#[test]
fn test_zero_radius_on_a_facility_keeps_it() {
    let table = seoul();
    let on_site = table.records()[0].location();
    let result = filter_and_rank(table.records(), &on_site, 0.0, &all(&table));
    assert_eq!(result.filtered.len(), 1);
    assert_eq!(result.nearest[0].distance_km, 0.0);
}
