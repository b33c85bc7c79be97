//! Embedded curated lexicon tables.
//!
//! Covers the abbreviations, misspellings, and term dictionaries a clinical
//! query stream actually hits. Deployments with broader ontologies load a
//! `LexiconData` document via `MedicalLexicon::from_json` instead.

use ahash::AHashMap;
use remedyx_common::EntityType;

use crate::lexicon::{LexiconData, TermEntry};

/// Abbreviation → expansions; the first expansion is the configured default
/// for ambiguous abbreviations.
const ABBREVIATIONS: &[(&str, &[&str])] = &[
    // Diseases / conditions
    ("dm", &["diabetes mellitus"]),
    ("dm1", &["type 1 diabetes mellitus"]),
    ("dm2", &["type 2 diabetes mellitus"]),
    ("t1dm", &["type 1 diabetes mellitus"]),
    ("t2dm", &["type 2 diabetes mellitus"]),
    ("htn", &["hypertension"]),
    ("mi", &["myocardial infarction", "mitral insufficiency"]),
    ("chf", &["congestive heart failure"]),
    ("copd", &["chronic obstructive pulmonary disease"]),
    ("cad", &["coronary artery disease"]),
    ("cvd", &["cardiovascular disease"]),
    ("ckd", &["chronic kidney disease"]),
    ("gerd", &["gastroesophageal reflux disease"]),
    ("ibs", &["irritable bowel syndrome"]),
    ("uti", &["urinary tract infection"]),
    ("dvt", &["deep vein thrombosis"]),
    ("pe", &["pulmonary embolism", "physical examination"]),
    ("tia", &["transient ischemic attack"]),
    ("cva", &["stroke"]),
    ("ms", &["multiple sclerosis", "mitral stenosis"]),
    ("ra", &["rheumatoid arthritis"]),
    ("oa", &["osteoarthritis"]),
    ("tb", &["tuberculosis"]),
    ("afib", &["atrial fibrillation"]),
    // Symptoms / signs
    ("sob", &["shortness of breath"]),
    ("cp", &["chest pain"]),
    ("ha", &["headache"]),
    // Clinical shorthand
    ("tx", &["treatment"]),
    ("rx", &["prescription"]),
    ("dx", &["diagnosis"]),
    ("sx", &["symptoms"]),
    ("hx", &["history"]),
    ("abx", &["antibiotics"]),
    ("prn", &["as needed"]),
    ("po", &["by mouth"]),
    ("iv", &["intravenous"]),
    ("im", &["intramuscular"]),
    ("bid", &["twice daily"]),
    ("tid", &["three times daily"]),
    ("qid", &["four times daily"]),
    ("qd", &["once daily"]),
    // Tests / procedures
    ("ecg", &["electrocardiogram"]),
    ("ekg", &["electrocardiogram"]),
    ("echo", &["echocardiogram"]),
    ("cxr", &["chest x-ray"]),
    ("cbc", &["complete blood count"]),
    ("bmp", &["basic metabolic panel"]),
    ("hba1c", &["hemoglobin a1c"]),
    ("mri", &["magnetic resonance imaging"]),
];

/// Curated misspelling → correction pairs seen in real query logs.
const MISSPELLINGS: &[(&str, &str)] = &[
    ("diabetis", "diabetes"),
    ("diabets", "diabetes"),
    ("hypertenion", "hypertension"),
    ("hypertention", "hypertension"),
    ("astma", "asthma"),
    ("athsma", "asthma"),
    ("neumonia", "pneumonia"),
    ("pneumoia", "pneumonia"),
    ("diarhea", "diarrhea"),
    ("diarrea", "diarrhea"),
    ("metropolol", "metoprolol"),
    ("metroprolol", "metoprolol"),
    ("metaformin", "metformin"),
    ("metformine", "metformin"),
    ("lisinipril", "lisinopril"),
    ("lisinapril", "lisinopril"),
    ("amoxicilin", "amoxicillin"),
    ("amoxacillin", "amoxicillin"),
    ("ibuprophen", "ibuprofen"),
    ("ibuprofin", "ibuprofen"),
    ("acetominophen", "acetaminophen"),
    ("acetaminophin", "acetaminophen"),
    ("omeprezole", "omeprazole"),
    ("omeprazol", "omeprazole"),
    ("colonoscapy", "colonoscopy"),
    ("endoscapy", "endoscopy"),
    ("mamogram", "mammogram"),
    ("mamography", "mammography"),
];

/// (surface, normalized) drug names. Brand names normalize to the generic.
const DRUGS: &[(&str, &str)] = &[
    ("metformin", "metformin"),
    ("glucophage", "metformin"),
    ("insulin", "insulin"),
    ("aspirin", "aspirin"),
    ("lisinopril", "lisinopril"),
    ("zestril", "lisinopril"),
    ("atorvastatin", "atorvastatin"),
    ("lipitor", "atorvastatin"),
    ("simvastatin", "simvastatin"),
    ("zocor", "simvastatin"),
    ("levothyroxine", "levothyroxine"),
    ("synthroid", "levothyroxine"),
    ("amlodipine", "amlodipine"),
    ("norvasc", "amlodipine"),
    ("metoprolol", "metoprolol"),
    ("lopressor", "metoprolol"),
    ("atenolol", "atenolol"),
    ("losartan", "losartan"),
    ("cozaar", "losartan"),
    ("hydrochlorothiazide", "hydrochlorothiazide"),
    ("furosemide", "furosemide"),
    ("lasix", "furosemide"),
    ("spironolactone", "spironolactone"),
    ("warfarin", "warfarin"),
    ("coumadin", "warfarin"),
    ("apixaban", "apixaban"),
    ("eliquis", "apixaban"),
    ("rivaroxaban", "rivaroxaban"),
    ("xarelto", "rivaroxaban"),
    ("clopidogrel", "clopidogrel"),
    ("plavix", "clopidogrel"),
    ("heparin", "heparin"),
    ("enoxaparin", "enoxaparin"),
    ("digoxin", "digoxin"),
    ("amiodarone", "amiodarone"),
    ("diltiazem", "diltiazem"),
    ("nitroglycerin", "nitroglycerin"),
    ("amoxicillin", "amoxicillin"),
    ("azithromycin", "azithromycin"),
    ("ciprofloxacin", "ciprofloxacin"),
    ("doxycycline", "doxycycline"),
    ("metronidazole", "metronidazole"),
    ("penicillin", "penicillin"),
    ("vancomycin", "vancomycin"),
    ("ceftriaxone", "ceftriaxone"),
    ("ibuprofen", "ibuprofen"),
    ("advil", "ibuprofen"),
    ("motrin", "ibuprofen"),
    ("acetaminophen", "acetaminophen"),
    ("tylenol", "acetaminophen"),
    ("paracetamol", "acetaminophen"),
    ("naproxen", "naproxen"),
    ("tramadol", "tramadol"),
    ("morphine", "morphine"),
    ("gabapentin", "gabapentin"),
    ("neurontin", "gabapentin"),
    ("prednisone", "prednisone"),
    ("omeprazole", "omeprazole"),
    ("prilosec", "omeprazole"),
    ("pantoprazole", "pantoprazole"),
    ("sertraline", "sertraline"),
    ("zoloft", "sertraline"),
    ("fluoxetine", "fluoxetine"),
    ("prozac", "fluoxetine"),
    ("albuterol", "albuterol"),
    ("ventolin", "albuterol"),
    ("montelukast", "montelukast"),
    ("cetirizine", "cetirizine"),
    ("loratadine", "loratadine"),
    ("epinephrine", "epinephrine"),
];

/// (surface, normalized) disease and condition names.
const DISEASES: &[(&str, &str)] = &[
    ("diabetes", "diabetes mellitus"),
    ("diabetes mellitus", "diabetes mellitus"),
    ("type 1 diabetes mellitus", "type 1 diabetes mellitus"),
    ("type 2 diabetes mellitus", "type 2 diabetes mellitus"),
    ("type 2 diabetes", "type 2 diabetes mellitus"),
    ("hypertension", "hypertension"),
    ("high blood pressure", "hypertension"),
    ("myocardial infarction", "myocardial infarction"),
    ("heart attack", "myocardial infarction"),
    ("heart failure", "heart failure"),
    ("congestive heart failure", "congestive heart failure"),
    ("atrial fibrillation", "atrial fibrillation"),
    ("coronary artery disease", "coronary artery disease"),
    ("cardiovascular disease", "cardiovascular disease"),
    ("stroke", "stroke"),
    ("transient ischemic attack", "transient ischemic attack"),
    ("deep vein thrombosis", "deep vein thrombosis"),
    ("pulmonary embolism", "pulmonary embolism"),
    ("chronic obstructive pulmonary disease", "chronic obstructive pulmonary disease"),
    ("asthma", "asthma"),
    ("pneumonia", "pneumonia"),
    ("bronchitis", "bronchitis"),
    ("influenza", "influenza"),
    ("tuberculosis", "tuberculosis"),
    ("chronic kidney disease", "chronic kidney disease"),
    ("urinary tract infection", "urinary tract infection"),
    ("gastroesophageal reflux disease", "gastroesophageal reflux disease"),
    ("irritable bowel syndrome", "irritable bowel syndrome"),
    ("hyperlipidemia", "hyperlipidemia"),
    ("hypothyroidism", "hypothyroidism"),
    ("hyperthyroidism", "hyperthyroidism"),
    ("anemia", "anemia"),
    ("sepsis", "sepsis"),
    ("cellulitis", "cellulitis"),
    ("anaphylaxis", "anaphylaxis"),
    ("multiple sclerosis", "multiple sclerosis"),
    ("epilepsy", "epilepsy"),
    ("migraine", "migraine"),
    ("depression", "depression"),
    ("anxiety", "anxiety"),
    ("rheumatoid arthritis", "rheumatoid arthritis"),
    ("osteoarthritis", "osteoarthritis"),
    ("arthritis", "arthritis"),
    ("osteoporosis", "osteoporosis"),
    ("gout", "gout"),
    ("cancer", "cancer"),
    ("chronic pain", "chronic pain"),
];

/// (surface, normalized) procedure names.
const PROCEDURES: &[(&str, &str)] = &[
    ("colonoscopy", "colonoscopy"),
    ("endoscopy", "endoscopy"),
    ("mammography", "mammography"),
    ("mammogram", "mammography"),
    ("biopsy", "biopsy"),
    ("appendectomy", "appendectomy"),
    ("cholecystectomy", "cholecystectomy"),
    ("angioplasty", "angioplasty"),
    ("cardiac catheterization", "cardiac catheterization"),
    ("coronary artery bypass graft", "coronary artery bypass graft"),
    ("dialysis", "dialysis"),
    ("echocardiogram", "echocardiogram"),
    ("electrocardiogram", "electrocardiogram"),
    ("chest x-ray", "chest x-ray"),
    ("computed tomography", "computed tomography"),
    ("magnetic resonance imaging", "magnetic resonance imaging"),
    ("ultrasound", "ultrasound"),
    ("intubation", "intubation"),
    ("bronchoscopy", "bronchoscopy"),
    ("arthroscopy", "arthroscopy"),
    ("hysterectomy", "hysterectomy"),
    ("tonsillectomy", "tonsillectomy"),
    ("cesarean section", "cesarean section"),
    ("vaccination", "vaccination"),
    ("blood transfusion", "blood transfusion"),
    ("surgery", "surgery"),
];

/// (surface, normalized) anatomical terms.
const ANATOMY: &[(&str, &str)] = &[
    ("heart", "heart"),
    ("lung", "lung"),
    ("lungs", "lung"),
    ("liver", "liver"),
    ("kidney", "kidney"),
    ("kidneys", "kidney"),
    ("brain", "brain"),
    ("stomach", "stomach"),
    ("pancreas", "pancreas"),
    ("thyroid", "thyroid"),
    ("bladder", "bladder"),
    ("colon", "colon"),
    ("esophagus", "esophagus"),
    ("spleen", "spleen"),
    ("gallbladder", "gallbladder"),
    ("artery", "artery"),
    ("vein", "vein"),
    ("aorta", "aorta"),
    ("spine", "spine"),
    ("abdomen", "abdomen"),
    ("chest", "chest"),
    ("skin", "skin"),
];

/// normalized term → synonyms used by the variant generator.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("metformin", &["glucophage"]),
    ("acetaminophen", &["tylenol", "paracetamol"]),
    ("ibuprofen", &["advil", "motrin"]),
    ("warfarin", &["coumadin"]),
    ("atorvastatin", &["lipitor"]),
    ("lisinopril", &["zestril"]),
    ("metoprolol", &["lopressor"]),
    ("furosemide", &["lasix"]),
    ("albuterol", &["ventolin"]),
    ("omeprazole", &["prilosec"]),
    ("levothyroxine", &["synthroid"]),
    ("apixaban", &["eliquis"]),
    ("rivaroxaban", &["xarelto"]),
    ("hypertension", &["high blood pressure"]),
    ("myocardial infarction", &["heart attack"]),
    ("diabetes mellitus", &["diabetes"]),
    ("stroke", &["cerebrovascular accident"]),
];

/// Ordinary query words that must never be "corrected" into medical terms.
const COMMON_WORDS: &[&str] = &[
    "what", "is", "are", "the", "a", "an", "of", "for", "and", "or", "to",
    "in", "on", "with", "without", "how", "much", "many", "can", "should",
    "when", "not", "use", "used", "take", "taking", "does", "do", "my",
    "you", "side", "effects", "effect", "adverse", "reaction", "reactions",
    "dose", "dosage", "dosing", "amount", "daily", "maximum", "recommended",
    "treatment", "treatments", "therapy", "manage", "management", "options",
    "option", "guidelines", "guideline", "symptoms", "signs", "causes",
    "risk", "factors", "interaction", "interactions", "contraindications",
    "contraindication", "warnings", "warning", "precautions", "safe",
    "safety", "together", "versus", "between", "definition", "overview",
    "about", "information", "prevention", "prevent", "diagnosis", "mg",
    "mcg", "ml", "g", "l", "units", "unit", "iu", "milligrams", "micrograms",
    "milliliters", "grams", "liters", "pain", "fever", "cough", "nausea",
];

pub(crate) fn builtin_data() -> LexiconData {
    let mut terms = Vec::new();
    for (set, entity_type) in [
        (DRUGS, EntityType::Drug),
        (DISEASES, EntityType::Disease),
        (PROCEDURES, EntityType::Procedure),
        (ANATOMY, EntityType::Anatomy),
    ] {
        for (surface, normalized) in set {
            terms.push(TermEntry::new(*surface, entity_type, *normalized));
        }
    }

    let abbreviations: AHashMap<String, Vec<String>> = ABBREVIATIONS
        .iter()
        .map(|(abbrev, expansions)| {
            (
                abbrev.to_string(),
                expansions.iter().map(|e| e.to_string()).collect(),
            )
        })
        .collect();

    let misspellings: AHashMap<String, String> = MISSPELLINGS
        .iter()
        .map(|(wrong, right)| (wrong.to_string(), right.to_string()))
        .collect();

    let synonyms: AHashMap<String, Vec<String>> = SYNONYMS
        .iter()
        .map(|(term, syns)| {
            (
                term.to_string(),
                syns.iter().map(|s| s.to_string()).collect(),
            )
        })
        .collect();

    LexiconData {
        abbreviations,
        misspellings,
        terms,
        synonyms,
        extra_vocabulary: COMMON_WORDS.iter().map(|w| w.to_string()).collect(),
    }
}
